use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

/// A single external command: program name, argument list, optional
/// working directory.
///
/// Invocations are ephemeral — built per task call, executed once,
/// discarded. Nothing is persisted between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: None,
        }
    }

    pub fn with_cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Render the invocation as a single shell line, for logging and
    /// dry-run display. A working directory renders as a `cd … && `
    /// prefix; arguments containing spaces are single-quoted.
    pub fn to_shell_command(&self) -> String {
        let mut cmd = String::new();
        if let Some(ref dir) = self.cwd {
            let dir = dir.display().to_string();
            if dir.contains(' ') {
                cmd.push_str(&format!("cd '{dir}' && "));
            } else {
                cmd.push_str(&format!("cd {dir} && "));
            }
        }
        cmd.push_str(&self.program);
        for arg in &self.args {
            cmd.push(' ');
            if arg.contains(' ') {
                cmd.push_str(&format!("'{arg}'"));
            } else {
                cmd.push_str(arg);
            }
        }
        cmd
    }

    /// Spawn the command and block until it exits. Stdout/stderr are
    /// inherited, not captured; the exit status is the only signal.
    pub fn execute(&self) -> io::Result<ExitStatus> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.cwd {
            cmd.current_dir(dir);
        }
        cmd.status()
    }
}
