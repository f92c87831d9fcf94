//! Capability probes for optional external tooling
//!
//! Tasks that branch on an optional capability (django-extensions for the
//! enhanced shell, sphinx-build for PDF builds, virtualenv for install
//! checks) take these probes as collaborator traits, so tests can fake
//! the answer instead of relying on real imports and PATH lookups.

use std::process::Command;

use tracing::debug;

/// State of the django-extensions plugin for a target project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionState {
    /// Not importable in the project's Python environment.
    Unavailable,
    /// Importable, but the project's settings do not enable it.
    Disabled,
    /// Importable and listed in the project's `INSTALLED_APPS`.
    Active,
}

/// Answers whether the enhanced-shell plugin is usable for a project.
pub trait ExtensionProbe {
    fn django_extensions(&self, settings_module: &str) -> ExtensionState;
}

/// Production probe: asks the project's own Python.
///
/// Importability alone is not enough — the plugin's management commands
/// only exist once the app is enabled — so the probe imports the target
/// project's settings at call time and checks `INSTALLED_APPS`. That
/// import is a coupling to Django we cannot avoid.
pub struct PythonProbe;

impl ExtensionProbe for PythonProbe {
    fn django_extensions(&self, settings_module: &str) -> ExtensionState {
        let script = format!(
            "import importlib, importlib.util, sys\n\
             if importlib.util.find_spec('django_extensions') is None:\n\
             \x20   print('unavailable'); sys.exit(0)\n\
             try:\n\
             \x20   settings = importlib.import_module('{settings_module}')\n\
             except Exception:\n\
             \x20   print('unavailable'); sys.exit(0)\n\
             apps = getattr(settings, 'INSTALLED_APPS', ())\n\
             print('active' if 'django_extensions' in apps else 'disabled')\n"
        );

        let output = Command::new("python").args(["-c", &script]).output();
        match output {
            Ok(out) if out.status.success() => {
                match String::from_utf8_lossy(&out.stdout).trim() {
                    "active" => ExtensionState::Active,
                    "disabled" => ExtensionState::Disabled,
                    _ => ExtensionState::Unavailable,
                }
            }
            Ok(out) => {
                debug!(
                    "django_extensions probe exited with {}: treating as unavailable",
                    out.status
                );
                ExtensionState::Unavailable
            }
            Err(e) => {
                debug!("could not spawn python for extensions probe: {e}");
                ExtensionState::Unavailable
            }
        }
    }
}

/// Answers whether an external tool can be spawned at all.
pub trait ToolProbe {
    fn is_runnable(&self, tool: &str) -> bool;
}

/// Production probe: spawn `<tool> --version` and check the exit status.
pub struct PathProbe;

impl ToolProbe for PathProbe {
    fn is_runnable(&self, tool: &str) -> bool {
        match Command::new(tool).arg("--version").output() {
            Ok(out) => out.status.success(),
            Err(e) => {
                debug!("`{tool} --version` could not be spawned: {e}");
                false
            }
        }
    }
}
