//! legwork - task helpers for everyday Django/Sphinx project chores
//!
//! This crate provides the task engine behind the `legwork` CLI:
//! - Wrap a Django project's `manage.py` (tests, syncdb + fixtures,
//!   shell and dev server with django-extensions upgrades)
//! - Drive a Sphinx `make`-based documentation build and locate its
//!   HTML/PDF output for display, upload, or gh-pages publishing
//! - Check that a distribution installs cleanly into a fresh virtualenv
//!
//! Every task assembles a [`command::Invocation`] from configuration and
//! runs it through an injected [`command::Executor`]; the subprocess exit
//! status is the only success signal.
pub mod command;
pub mod config;
pub mod docs;
pub mod error;
pub mod manage;
pub mod pkg;
pub mod probe;

// Re-export commonly used types and traits
pub use error::{Error, Result};

// Re-export main API components
pub use command::{Executor, Invocation, ProcessExecutor, RecordingExecutor};
pub use config::Config;
pub use docs::DocsTasks;
pub use manage::ManageTasks;
pub use pkg::PkgTasks;
