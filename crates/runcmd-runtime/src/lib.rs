//! Command execution for runcmd.
//!
//! Runs a materialized artifact through a shell with the parameter
//! environment, an optional deadline and an optional identity drop, writing
//! the child's output streams to caller-supplied files.
//!
//! Callers must branch on the returned `Result` first. A failure to start the
//! process carries no exit code at all (see [`ExecError::exit_code`]).

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod error;
mod executor;
mod output;
mod shutdown;

pub use error::{ExecError, ExecResult};
pub use executor::{
    CommandExecutor, DEFAULT_GRACE_PERIOD, DEFAULT_SHELL, ExecutionResult, Identity, Invocation,
    resolve_user,
};
pub use output::{STDERR_FILE, STDOUT_FILE, exec_in_directory, log_paths};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
