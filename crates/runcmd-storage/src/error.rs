//! Error types for SAS URL construction.

use thiserror::Error;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised while validating inputs or signing a blob URL.
///
/// All of these are raised before any network call is made.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage account name violates the naming rule.
    #[error(
        "azure: account name is not valid: it must be between 3 and 24 characters, and only may contain numbers and lowercase letters: {name:?}"
    )]
    InvalidAccount {
        /// The rejected account name
        name: String,
    },

    /// The access key is missing or malformed.
    #[error(transparent)]
    InvalidCredential(#[from] CredentialError),

    /// The storage endpoint does not form a valid blob URL.
    #[error("azure: storage endpoint is not valid: {reason}")]
    InvalidEndpoint {
        /// What was wrong with the endpoint
        reason: String,
    },

    /// The blob name is empty.
    #[error("azure: blob name is required")]
    MissingBlobName,

    /// The signing key could not be used.
    #[error("azure: failed to compute signature: {0}")]
    Signing(String),
}

/// Ways an access key can be unusable.
///
/// Both map to [`StorageError::InvalidCredential`] but keep distinct messages.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No key was supplied.
    #[error("azure: account key required")]
    Missing,

    /// The key is not valid base64.
    #[error("azure: malformed storage account key: {0}")]
    Malformed(#[from] base64::DecodeError),
}
