//! Packaging checks: does the distribution install cleanly?

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::command::{Executor, Invocation};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::probe::ToolProbe;

/// Installer exercised inside the throwaway virtualenv.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Installer {
    Pip,
    EasyInstall,
}

impl Installer {
    /// Shell line that installs `name` with this installer, from the
    /// virtualenv's own bin directory.
    fn bootstrap_line(self, name: &str) -> String {
        match self {
            Installer::Pip => format!("./testenv/bin/pip install '{name}'"),
            Installer::EasyInstall => format!("./testenv/bin/easy_install '{name}'"),
        }
    }
}

/// Bootstrap script for one install check: build a virtualenv named
/// `testenv`, then install the distribution with it. `set -e` makes any
/// non-zero step abort the script.
fn bootstrap_script(installer: Installer, name: &str) -> String {
    format!(
        "#!/bin/sh\nset -e\nvirtualenv testenv\n{}\n",
        installer.bootstrap_line(name)
    )
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Packaging tasks, bound to a loaded config and an executor.
pub struct PkgTasks<'a> {
    config: &'a Config,
    executor: &'a dyn Executor,
    tools: &'a dyn ToolProbe,
}

impl<'a> PkgTasks<'a> {
    pub fn new(config: &'a Config, executor: &'a dyn Executor, tools: &'a dyn ToolProbe) -> Self {
        Self {
            config,
            executor,
            tools,
        }
    }

    /// Send the given arguments to `pip install`.
    pub fn pip_install(&self, args: &[String]) -> Result<()> {
        let mut all = vec!["install".to_string()];
        all.extend(args.iter().cloned());
        self.executor.run(&Invocation::new("pip", all))
    }

    /// Send the given arguments to `easy_install`.
    pub fn easy_install(&self, args: &[String]) -> Result<()> {
        self.executor
            .run(&Invocation::new("easy_install", args.to_vec()))
    }

    /// pip-install the distribution in an empty virtualenv to check for
    /// install errors.
    pub fn pypi_pip(&self) -> Result<()> {
        self.install_check(Installer::Pip)
    }

    /// easy_install the distribution in an empty virtualenv to check for
    /// install errors.
    pub fn pypi_easy_install(&self) -> Result<()> {
        self.install_check(Installer::EasyInstall)
    }

    /// Both install checks, sequentially. The checks are independent;
    /// the first failure still stops the run.
    pub fn pypi(&self) -> Result<()> {
        self.pypi_easy_install()?;
        self.pypi_pip()
    }

    fn install_check(&self, installer: Installer) -> Result<()> {
        if !self.tools.is_runnable("virtualenv") {
            return Err(Error::ToolNotFound {
                tool: "virtualenv",
                install: "virtualenv",
            });
        }
        let name = self
            .config
            .setup
            .name
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(Error::MissingOption {
                key: "setup.name",
                what: "distribution name",
            })?;

        // The scratch directory lives only as long as this check and is
        // removed on every exit path, including failures.
        let root = tempfile::Builder::new()
            .prefix(&format!("{name}_"))
            .tempdir()?;
        let script = root.path().join("start_virtualenv");
        if self.executor.is_dry_run() {
            info!("dry-run: write bootstrap script {}", script.display());
        } else {
            fs::write(&script, bootstrap_script(installer, name))?;
            set_executable(&script)?;
        }
        debug!("checking that `{name}` installs via {installer:?}");
        self.executor
            .run(&Invocation::new("./start_virtualenv", vec![]).with_cwd(root.path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::RecordingExecutor;

    struct FixedTool(bool);

    impl ToolProbe for FixedTool {
        fn is_runnable(&self, _tool: &str) -> bool {
            self.0
        }
    }

    fn named() -> Config {
        let mut config = Config::default();
        config.setup.name = Some("mypkg".to_string());
        config
    }

    #[test]
    fn test_pip_install_forwards_args() {
        let config = Config::default();
        let executor = RecordingExecutor::new();
        let tool = FixedTool(true);
        let tasks = PkgTasks::new(&config, &executor, &tool);

        tasks
            .pip_install(&["--upgrade".to_string(), "requests".to_string()])
            .unwrap();

        let calls = executor.recorded();
        assert_eq!(calls[0].program, "pip");
        assert_eq!(calls[0].args, vec!["install", "--upgrade", "requests"]);
    }

    #[test]
    fn test_easy_install_forwards_args() {
        let config = Config::default();
        let executor = RecordingExecutor::new();
        let tool = FixedTool(true);
        let tasks = PkgTasks::new(&config, &executor, &tool);

        tasks.easy_install(&["requests".to_string()]).unwrap();

        let calls = executor.recorded();
        assert_eq!(calls[0].program, "easy_install");
        assert_eq!(calls[0].args, vec!["requests"]);
    }

    #[test]
    fn test_install_check_requires_virtualenv() {
        let config = named();
        let executor = RecordingExecutor::new();
        let tool = FixedTool(false);
        let tasks = PkgTasks::new(&config, &executor, &tool);

        let err = tasks.pypi_pip().unwrap_err();
        assert!(matches!(
            err,
            Error::ToolNotFound {
                tool: "virtualenv",
                ..
            }
        ));
        assert!(executor.recorded().is_empty());
    }

    #[test]
    fn test_install_check_requires_a_distribution_name() {
        let config = Config::default();
        let executor = RecordingExecutor::new();
        let tool = FixedTool(true);
        let tasks = PkgTasks::new(&config, &executor, &tool);

        let err = tasks.pypi_pip().unwrap_err();
        assert!(matches!(
            err,
            Error::MissingOption {
                key: "setup.name",
                ..
            }
        ));
        assert!(executor.recorded().is_empty());
    }

    #[test]
    fn test_install_check_runs_the_bootstrap_script_from_its_directory() {
        let config = named();
        let executor = RecordingExecutor::new();
        let tool = FixedTool(true);
        let tasks = PkgTasks::new(&config, &executor, &tool);

        tasks.pypi_pip().unwrap();

        let calls = executor.recorded();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "./start_virtualenv");
        assert!(calls[0].args.is_empty());
        assert!(calls[0].cwd.is_some(), "must run from the scratch directory");
    }

    #[test]
    fn test_bootstrap_script_contents() {
        let script = bootstrap_script(Installer::Pip, "mypkg");
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("set -e"));
        assert!(script.contains("virtualenv testenv"));
        assert!(script.contains("./testenv/bin/pip install 'mypkg'"));

        let script = bootstrap_script(Installer::EasyInstall, "mypkg");
        assert!(script.contains("./testenv/bin/easy_install 'mypkg'"));
    }

    #[test]
    fn test_pypi_runs_both_checks() {
        let config = named();
        let executor = RecordingExecutor::new();
        let tool = FixedTool(true);
        let tasks = PkgTasks::new(&config, &executor, &tool);

        tasks.pypi().unwrap();

        assert_eq!(executor.recorded().len(), 2);
    }

    #[test]
    fn test_pypi_stops_on_the_first_failure() {
        let config = named();
        let executor = RecordingExecutor::failing_at(0);
        let tool = FixedTool(true);
        let tasks = PkgTasks::new(&config, &executor, &tool);

        assert!(tasks.pypi().is_err());
        assert_eq!(executor.recorded().len(), 1);
    }
}
