//! CLI error type and exit code mapping.

use runcmd_core::SettingsError;
use runcmd_download::DownloadError;
use runcmd_runtime::ExecError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument validation error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// The settings document could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] SettingsError),

    /// The working directory could not be prepared.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Selecting, fetching or saving an artifact failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The command could not be run or finished unsuccessfully.
    #[error(transparent)]
    Exec(#[from] ExecError),
}

impl CliError {
    /// Map error to a process exit code.
    ///
    /// A command that ran and failed propagates its own status. Otherwise the
    /// codes follow sysexits.h where one fits:
    /// - 1: General error
    /// - 2: Invalid arguments
    /// - 74: IO error
    /// - 78: Configuration error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 2,
            Self::Config(_) => 78,
            Self::Io(_) => 74,
            Self::Download(_) => 1,
            Self::Exec(err) => err.exit_code().filter(|code| *code != 0).unwrap_or(1),
        }
    }
}
