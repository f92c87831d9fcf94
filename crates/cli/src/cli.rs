use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use legwork_core::command::{Executor, ProcessExecutor};
use legwork_core::Config;

use crate::commands::{
    clean_docs_command, docs_command, easy_install_command, ghpages_command, init_command,
    manage_command, pdf_command, pip_install_command, pypi_command, pypi_easy_install_command,
    pypi_pip_command, rsync_docs_command, shell_command, showhtml_command, showpdf_command,
    start_command, syncdb_command, test_command,
};

/// Everyday project chores: Django management, Sphinx docs, packaging checks
#[derive(Parser, Debug)]
#[command(name = "legwork")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    /// Print each external command instead of running it
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Config file to use instead of searching parent directories
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Forward arguments to manage.py verbatim
    Manage {
        /// Arguments passed through to the management script
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run the Django test suite
    Test {
        /// Extra arguments for `manage.py test`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Synchronize the database, then load the configured fixtures
    Syncdb {
        /// Arguments replacing the default `--noinput`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Open a Django shell (shell_plus when django-extensions is active)
    Shell,
    /// Start the dev server (runserver_plus when django-extensions is active)
    Start,
    /// Make the Sphinx docs
    Docs,
    /// Clean the Sphinx build output
    #[command(name = "clean-docs", visible_alias = "clean_docs")]
    CleanDocs,
    /// Build the docs, then rsync them to the configured upload location
    #[command(name = "rsync-docs", visible_alias = "rsync_docs")]
    RsyncDocs,
    /// Publish the built HTML docs to the gh-pages branch (DESTROYS that branch)
    Ghpages,
    /// Open the generated HTML documentation in a browser
    Showhtml,
    /// Open the generated PDF documentation
    Showpdf,
    /// Build PDF documentation with sphinx-build and make
    Pdf,
    /// Send the given arguments to `pip install`
    #[command(name = "pip-install", visible_alias = "pip_install")]
    PipInstall {
        /// Arguments passed through to pip
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Send the given arguments to `easy_install`
    #[command(name = "easy-install", visible_alias = "easy_install")]
    EasyInstall {
        /// Arguments passed through to easy_install
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// pip-install the package into an empty virtualenv as an install check
    #[command(name = "pypi-pip", visible_alias = "pypi_pip")]
    PypiPip,
    /// easy_install the package into an empty virtualenv as an install check
    #[command(name = "pypi-easy-install", visible_alias = "pypi_easy_install")]
    PypiEasyInstall,
    /// Run both virtualenv install checks
    Pypi,
    /// Write a starter .legwork.json in the current directory
    Init {
        /// Force overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Load the configuration, build the executor, and run the command.
    pub fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let executor = ProcessExecutor::new(self.dry_run);
        self.command.execute(&config, &executor)
    }
}

impl Commands {
    /// Execute the command against a loaded config and executor.
    pub fn execute(self, config: &Config, executor: &dyn Executor) -> Result<()> {
        match self {
            Commands::Manage { args } => manage_command(config, executor, &args),
            Commands::Test { args } => test_command(config, executor, &args),
            Commands::Syncdb { args } => syncdb_command(config, executor, &args),
            Commands::Shell => shell_command(config, executor),
            Commands::Start => start_command(config, executor),
            Commands::Docs => docs_command(config, executor),
            Commands::CleanDocs => clean_docs_command(config, executor),
            Commands::RsyncDocs => rsync_docs_command(config, executor),
            Commands::Ghpages => ghpages_command(config, executor),
            Commands::Showhtml => showhtml_command(config, executor),
            Commands::Showpdf => showpdf_command(config, executor),
            Commands::Pdf => pdf_command(config, executor),
            Commands::PipInstall { args } => pip_install_command(config, executor, &args),
            Commands::EasyInstall { args } => easy_install_command(config, executor, &args),
            Commands::PypiPip => pypi_pip_command(config, executor),
            Commands::PypiEasyInstall => pypi_easy_install_command(config, executor),
            Commands::Pypi => pypi_command(config, executor),
            Commands::Init { force } => init_command(force),
        }
    }
}

/// Load the configuration: an explicit `--config` path, or the nearest
/// `.legwork.json` walking up from the working directory, or defaults
/// when neither exists.
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            Config::find_config_file(&cwd)
        }
    };
    match path {
        Some(path) => {
            debug!("loading config from {}", path.display());
            Config::load_from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => {
            debug!("no config file found, using defaults");
            Ok(Config::default())
        }
    }
}
