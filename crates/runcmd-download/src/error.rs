//! Error types for download operations.

use std::path::PathBuf;

use runcmd_storage::StorageError;
use thiserror::Error;

/// Result type alias for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;

/// Errors that can occur while selecting, fetching or saving an artifact.
#[derive(Debug, Error)]
pub enum DownloadError {
    // === Initialization ===
    /// The blob request could not be signed.
    #[error("failed to initialize azure storage client: {0}")]
    Init(#[source] StorageError),

    /// The HTTP client could not be constructed.
    #[error("failed to create http client: {0}")]
    Client(#[source] reqwest::Error),

    /// The HTTP request could not be constructed.
    #[error("failed to build http request: {0}")]
    Request(#[source] reqwest::Error),

    // === Source naming ===
    /// The source is not a parseable URL.
    #[error("unable to parse URL: {url:?}")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The source URL uses a scheme other than http or https.
    #[error("unsupported URL scheme {scheme:?} in {url:?}")]
    UnsupportedScheme { scheme: String, url: String },

    /// No usable file name could be derived from the source.
    #[error("cannot extract file name from URL: {url:?}")]
    NoFileName { url: String },

    /// Two sources of one batch would write the same file.
    #[error("sources {first:?} and {second:?} both resolve to file name {name:?}")]
    DuplicateFileName {
        name: String,
        first: String,
        second: String,
    },

    // === Transfer ===
    /// The request never produced a response (DNS, connect, TLS).
    #[error("http request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("unexpected status code: actual={status} expected=2xx")]
    UnexpectedStatus { status: u16 },

    /// Reading the response body failed midway.
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    // === Filesystem ===
    /// Writing or post-processing the artifact failed.
    #[error("failed to save {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Create an I/O error bound to the file it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status of an `UnexpectedStatus` failure.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }
}
