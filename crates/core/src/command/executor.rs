use std::cell::RefCell;

use tracing::{debug, info};

use super::Invocation;
use crate::error::{Error, Result};

/// Execution seam for external commands.
///
/// Every task routes its subprocess calls through this trait so the
/// production path (spawn a real process) and the test path (record the
/// call) stay interchangeable.
pub trait Executor {
    /// Run the invocation to completion. A non-zero exit becomes
    /// [`Error::CommandFailed`] carrying the rendered command line and
    /// the exit status.
    fn run(&self, invocation: &Invocation) -> Result<()>;

    /// Whether this executor is skipping real work. Tasks consult this
    /// before file-system side effects (marker files, artifact copies)
    /// so a dry run leaves the tree untouched.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Production executor: spawns the process with inherited stdio and
/// blocks until it exits.
pub struct ProcessExecutor {
    dry_run: bool,
}

impl ProcessExecutor {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl Executor for ProcessExecutor {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        let rendered = invocation.to_shell_command();
        if self.dry_run {
            info!("dry-run: {rendered}");
            return Ok(());
        }
        debug!("running: {rendered}");
        let status = invocation.execute()?;
        if !status.success() {
            return Err(Error::CommandFailed {
                command: rendered,
                code: status.code().unwrap_or(1),
            });
        }
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Test executor: records every invocation instead of spawning it, and
/// can be told to fail at a given call index to exercise abort paths.
#[derive(Default)]
pub struct RecordingExecutor {
    calls: RefCell<Vec<Invocation>>,
    fail_at: Option<usize>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `index`-th recorded call (0-based) with exit status 1.
    pub fn failing_at(index: usize) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_at: Some(index),
        }
    }

    /// Invocations recorded so far, in call order.
    pub fn recorded(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        let index = self.calls.borrow().len();
        self.calls.borrow_mut().push(invocation.clone());
        if self.fail_at == Some(index) {
            return Err(Error::CommandFailed {
                command: invocation.to_shell_command(),
                code: 1,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_executor_keeps_call_order() {
        let executor = RecordingExecutor::new();
        executor
            .run(&Invocation::new("make", vec!["html".to_string()]))
            .unwrap();
        executor
            .run(&Invocation::new("make", vec!["clean".to_string()]))
            .unwrap();

        let calls = executor.recorded();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args, vec!["html"]);
        assert_eq!(calls[1].args, vec!["clean"]);
    }

    #[test]
    fn test_recording_executor_fails_at_index() {
        let executor = RecordingExecutor::failing_at(1);
        executor
            .run(&Invocation::new("true", vec![]))
            .unwrap();
        let err = executor
            .run(&Invocation::new("false", vec![]))
            .unwrap_err();
        assert!(matches!(err, Error::CommandFailed { code: 1, .. }));
    }
}
