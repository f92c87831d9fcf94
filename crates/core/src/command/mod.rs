//! Command construction and execution

pub mod executor;
pub mod invocation;

// Re-export commonly used types
pub use executor::{Executor, ProcessExecutor, RecordingExecutor};
pub use invocation::Invocation;
