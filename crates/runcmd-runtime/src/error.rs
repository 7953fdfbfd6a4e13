//! Error types for command execution.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for execution operations.
pub type ExecResult<T> = Result<T, ExecError>;

/// Errors that can occur while launching or running a command.
#[derive(Debug, Error)]
pub enum ExecError {
    // === Before launch ===
    /// The `runAsUser` account does not exist or could not be looked up.
    #[error("failed to resolve user {user:?}")]
    UnknownUser {
        user: String,
        #[source]
        source: Option<nix::Error>,
    },

    /// An output file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The shell could not be spawned.
    #[error("failed to execute command: {0}")]
    Launch(#[source] std::io::Error),

    // === After launch ===
    /// Waiting on or signalling the child failed.
    #[error("failed to wait for command: {0}")]
    Wait(#[source] std::io::Error),

    /// The deadline fired and the child was terminated.
    #[error("command timed out after {seconds}s and terminated with exit status={code}")]
    Timeout { seconds: u64, code: i32 },

    /// The child ran and finished unsuccessfully.
    #[error("command terminated with exit status={code}")]
    Exit {
        code: i32,
        /// Terminating signal, if the child did not exit on its own.
        signal: Option<i32>,
    },
}

impl ExecError {
    /// Exit status of the child, if it ran.
    ///
    /// `None` means the process never started; it is never reported as 0.
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Exit { code, .. } | Self::Timeout { code, .. } => Some(*code),
            _ => None,
        }
    }
}
