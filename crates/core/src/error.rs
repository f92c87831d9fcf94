use std::io;
use std::path::PathBuf;

/// Errors that can occur while running legwork tasks
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required configuration value is missing or falsy. Raised before
    /// any external process is started; the message names the exact key
    /// to set.
    #[error("{what} is not configured; set `{key}` in .legwork.json")]
    MissingOption {
        key: &'static str,
        what: &'static str,
    },

    /// An external command exited non-zero.
    #[error("command failed with exit status {code}: {command}")]
    CommandFailed { command: String, code: i32 },

    /// A directory a task needs (docs root, build output) does not exist.
    #[error("{what} ({}) does not exist", .path.display())]
    MissingDirectory { what: &'static str, path: PathBuf },

    /// No `*.pdf` artifact was found under the LaTeX build directory.
    #[error("no pdf files found under {}", .0.display())]
    NoPdfFound(PathBuf),

    /// An optional external tool the task depends on is not runnable.
    #[error("`{tool}` not found; install {install} to use this task")]
    ToolNotFound {
        tool: &'static str,
        install: &'static str,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl Error {
    /// Exit code the CLI should report for this error.
    ///
    /// A failed subprocess propagates its own exit status; configuration
    /// and missing-artifact errors have no process to report a code from
    /// and map to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::CommandFailed { code, .. } if *code > 0 => *code,
            _ => 1,
        }
    }
}

/// Result type alias for legwork operations
pub type Result<T> = std::result::Result<T, Error>;
