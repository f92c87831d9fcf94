//! Tasks that wrap a Django project's `manage.py`.

use tracing::info;

use crate::command::{Executor, Invocation};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::probe::{ExtensionProbe, ExtensionState};

/// Django management tasks, bound to a loaded config and an executor.
///
/// Every task funnels through [`ManageTasks::call_manage`], which decides
/// how the project is invoked: via its own `manage.py` (from that file's
/// directory) when `manage.manage_py` is set, via `django-admin.py` on
/// the PATH otherwise. The configured settings module is always passed
/// explicitly as a trailing `--settings=` argument.
pub struct ManageTasks<'a> {
    config: &'a Config,
    executor: &'a dyn Executor,
    extensions: &'a dyn ExtensionProbe,
}

impl<'a> ManageTasks<'a> {
    pub fn new(
        config: &'a Config,
        executor: &'a dyn Executor,
        extensions: &'a dyn ExtensionProbe,
    ) -> Self {
        Self {
            config,
            executor,
            extensions,
        }
    }

    /// Run one management command with the configured settings module.
    ///
    /// `tokens` is the command plus its arguments, e.g. `["loaddata",
    /// "users"]`. Fails with [`Error::MissingOption`] before spawning
    /// anything when `manage.settings` is unset.
    pub fn call_manage(&self, tokens: &[String]) -> Result<()> {
        let settings = self.require_settings()?;
        self.run_manage(settings, tokens)
    }

    /// Forward arbitrary arguments to the management script verbatim.
    pub fn manage(&self, args: &[String]) -> Result<()> {
        self.call_manage(args)
    }

    /// Run the project's test suite.
    ///
    /// `manage.test.settings` replaces the regular settings module for
    /// this call when set, so a test database configuration can live
    /// alongside the development one.
    pub fn test(&self, args: &[String]) -> Result<()> {
        let settings = match self.test_settings() {
            Some(s) => s,
            None => self.require_settings()?,
        };
        let mut tokens = vec!["test".to_string()];
        tokens.extend(args.iter().cloned());
        self.run_manage(settings, &tokens)
    }

    /// Synchronize the database, then load the configured fixtures.
    ///
    /// Without arguments the sync runs non-interactively as
    /// `syncdb --noinput`; any arguments replace the `--noinput` default
    /// rather than adding to it. Fixtures load in configuration order,
    /// one `loaddata` each, and the first failure stops the rest.
    pub fn syncdb(&self, args: &[String]) -> Result<()> {
        let mut tokens = vec!["syncdb".to_string()];
        if args.is_empty() {
            tokens.push("--noinput".to_string());
        } else {
            tokens.extend(args.iter().cloned());
        }
        self.call_manage(&tokens)?;

        for fixture in &self.config.manage.syncdb.fixtures {
            self.call_manage(&["loaddata".to_string(), fixture.clone()])?;
        }
        Ok(())
    }

    /// Open a Django shell, upgraded to `shell_plus` when the
    /// django-extensions app is active in the project.
    pub fn shell(&self) -> Result<()> {
        self.prefer_extension("shell_plus", "shell")
    }

    /// Start the development server, upgraded to `runserver_plus` when
    /// the django-extensions app is active in the project.
    pub fn start(&self) -> Result<()> {
        self.prefer_extension("runserver_plus", "runserver")
    }

    /// Settings module for management commands. Unset and empty both
    /// count as missing.
    fn require_settings(&self) -> Result<&'a str> {
        self.config
            .manage
            .settings
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(Error::MissingOption {
                key: "manage.settings",
                what: "Django settings module",
            })
    }

    fn test_settings(&self) -> Option<&'a str> {
        self.config
            .manage
            .test
            .settings
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    fn prefer_extension(&self, plus: &str, plain: &str) -> Result<()> {
        let settings = self.require_settings()?;
        let command = match self.extensions.django_extensions(settings) {
            ExtensionState::Active => plus,
            ExtensionState::Disabled => {
                info!("django-extensions is installed but not in INSTALLED_APPS; using {plain}");
                plain
            }
            ExtensionState::Unavailable => {
                info!("django-extensions is not available; using {plain}");
                plain
            }
        };
        self.run_manage(settings, &[command.to_string()])
    }

    fn run_manage(&self, settings: &str, tokens: &[String]) -> Result<()> {
        let invocation = match &self.config.manage.manage_py {
            Some(manage_py) => {
                let file = manage_py
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| manage_py.display().to_string());
                let mut args = Vec::with_capacity(tokens.len() + 2);
                args.push(format!("./{file}"));
                args.extend(tokens.iter().cloned());
                args.push(format!("--settings={settings}"));

                let invocation = Invocation::new("python", args);
                match manage_py.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => {
                        invocation.with_cwd(parent)
                    }
                    _ => invocation,
                }
            }
            None => {
                let mut args = tokens.to_vec();
                args.push(format!("--settings={settings}"));
                Invocation::new("django-admin.py", args)
            }
        };
        self.executor.run(&invocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::RecordingExecutor;
    use std::path::PathBuf;

    struct FixedProbe(ExtensionState);

    impl ExtensionProbe for FixedProbe {
        fn django_extensions(&self, _settings_module: &str) -> ExtensionState {
            self.0
        }
    }

    fn configured() -> Config {
        let mut config = Config::default();
        config.manage.settings = Some("proj.settings".to_string());
        config
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_manage_requires_settings() {
        let config = Config::default();
        let executor = RecordingExecutor::new();
        let probe = FixedProbe(ExtensionState::Unavailable);
        let tasks = ManageTasks::new(&config, &executor, &probe);

        let err = tasks.manage(&strings(&["version"])).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingOption {
                key: "manage.settings",
                ..
            }
        ));
        assert!(executor.recorded().is_empty(), "nothing should be spawned");
    }

    #[test]
    fn test_empty_settings_count_as_missing() {
        let mut config = Config::default();
        config.manage.settings = Some(String::new());
        let executor = RecordingExecutor::new();
        let probe = FixedProbe(ExtensionState::Unavailable);
        let tasks = ManageTasks::new(&config, &executor, &probe);

        assert!(tasks.manage(&strings(&["version"])).is_err());
    }

    #[test]
    fn test_manage_falls_back_to_django_admin() {
        let config = configured();
        let executor = RecordingExecutor::new();
        let probe = FixedProbe(ExtensionState::Unavailable);
        let tasks = ManageTasks::new(&config, &executor, &probe);

        tasks.manage(&strings(&["flush"])).unwrap();

        let calls = executor.recorded();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "django-admin.py");
        assert_eq!(calls[0].args, vec!["flush", "--settings=proj.settings"]);
        assert_eq!(calls[0].cwd, None);
    }

    #[test]
    fn test_manage_runs_manage_py_from_its_directory() {
        let mut config = configured();
        config.manage.manage_py = Some(PathBuf::from("/proj/manage.py"));
        let executor = RecordingExecutor::new();
        let probe = FixedProbe(ExtensionState::Unavailable);
        let tasks = ManageTasks::new(&config, &executor, &probe);

        tasks.manage(&strings(&["flush"])).unwrap();

        let calls = executor.recorded();
        assert_eq!(calls[0].program, "python");
        assert_eq!(
            calls[0].args,
            vec!["./manage.py", "flush", "--settings=proj.settings"]
        );
        assert_eq!(calls[0].cwd, Some(PathBuf::from("/proj")));
    }

    #[test]
    fn test_bare_manage_py_needs_no_cd() {
        let mut config = configured();
        config.manage.manage_py = Some(PathBuf::from("manage.py"));
        let executor = RecordingExecutor::new();
        let probe = FixedProbe(ExtensionState::Unavailable);
        let tasks = ManageTasks::new(&config, &executor, &probe);

        tasks.manage(&strings(&["version"])).unwrap();

        assert_eq!(executor.recorded()[0].cwd, None);
    }

    #[test]
    fn test_test_prefers_test_settings() {
        let mut config = configured();
        config.manage.test.settings = Some("proj.settings_test".to_string());
        let executor = RecordingExecutor::new();
        let probe = FixedProbe(ExtensionState::Unavailable);
        let tasks = ManageTasks::new(&config, &executor, &probe);

        tasks.test(&strings(&["myapp"])).unwrap();
        tasks.manage(&strings(&["version"])).unwrap();

        let calls = executor.recorded();
        assert_eq!(
            calls[0].args,
            vec!["test", "myapp", "--settings=proj.settings_test"]
        );
        // Only the test task picks up the override.
        assert_eq!(calls[1].args, vec!["version", "--settings=proj.settings"]);
    }

    #[test]
    fn test_syncdb_defaults_to_noinput() {
        let mut config = configured();
        config.manage.syncdb.fixtures = strings(&["users", "sites"]);
        let executor = RecordingExecutor::new();
        let probe = FixedProbe(ExtensionState::Unavailable);
        let tasks = ManageTasks::new(&config, &executor, &probe);

        tasks.syncdb(&[]).unwrap();

        let calls = executor.recorded();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[0].args,
            vec!["syncdb", "--noinput", "--settings=proj.settings"]
        );
        assert_eq!(
            calls[1].args,
            vec!["loaddata", "users", "--settings=proj.settings"]
        );
        assert_eq!(
            calls[2].args,
            vec!["loaddata", "sites", "--settings=proj.settings"]
        );
    }

    #[test]
    fn test_syncdb_args_replace_noinput() {
        let config = configured();
        let executor = RecordingExecutor::new();
        let probe = FixedProbe(ExtensionState::Unavailable);
        let tasks = ManageTasks::new(&config, &executor, &probe);

        tasks.syncdb(&strings(&["--migrate"])).unwrap();

        assert_eq!(
            executor.recorded()[0].args,
            vec!["syncdb", "--migrate", "--settings=proj.settings"]
        );
    }

    #[test]
    fn test_syncdb_stops_at_first_failing_fixture() {
        let mut config = configured();
        config.manage.syncdb.fixtures = strings(&["users", "sites"]);
        // Call 0 is syncdb itself; call 1 is the first loaddata.
        let executor = RecordingExecutor::failing_at(1);
        let probe = FixedProbe(ExtensionState::Unavailable);
        let tasks = ManageTasks::new(&config, &executor, &probe);

        let err = tasks.syncdb(&[]).unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
        assert_eq!(executor.recorded().len(), 2, "later fixtures must not load");
    }

    #[test]
    fn test_shell_upgrades_when_extensions_active() {
        let config = configured();
        let executor = RecordingExecutor::new();
        let probe = FixedProbe(ExtensionState::Active);
        let tasks = ManageTasks::new(&config, &executor, &probe);

        tasks.shell().unwrap();

        assert_eq!(
            executor.recorded()[0].args,
            vec!["shell_plus", "--settings=proj.settings"]
        );
    }

    #[test]
    fn test_shell_falls_back_when_extensions_disabled() {
        let config = configured();
        let executor = RecordingExecutor::new();
        let probe = FixedProbe(ExtensionState::Disabled);
        let tasks = ManageTasks::new(&config, &executor, &probe);

        tasks.shell().unwrap();

        assert_eq!(
            executor.recorded()[0].args,
            vec!["shell", "--settings=proj.settings"]
        );
    }

    #[test]
    fn test_start_upgrades_when_extensions_active() {
        let config = configured();
        let executor = RecordingExecutor::new();
        let probe = FixedProbe(ExtensionState::Active);
        let tasks = ManageTasks::new(&config, &executor, &probe);

        tasks.start().unwrap();

        assert_eq!(
            executor.recorded()[0].args,
            vec!["runserver_plus", "--settings=proj.settings"]
        );
    }
}
