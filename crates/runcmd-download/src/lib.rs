//! Artifact download layer for runcmd.
//!
//! - `downloader` - the closed set of download sources (blob, plain URL)
//! - `selector` - classifies a source string and builds its downloader
//! - `materialize` - writes a download to disk as an executable artifact
//!
//! A download never retries; every failure is terminal for that attempt.

#![deny(unused_crate_dependencies)]

mod config;
mod downloader;
mod error;
mod materialize;
mod selector;

pub use config::HttpClientConfig;
pub use downloader::{
    BlobDownloader, BodyStream, DownloadOutcome, Downloader, UrlDownloader, download,
};
pub use error::{DownloadError, DownloadResult};
pub use materialize::{
    ARTIFACT_MODE, materialize, materialize_all, normalize_line_endings, save_script_file,
    url_to_file_name,
};
pub use selector::{BlobLocation, DownloaderSelector, STORAGE_SUFFIXES, classify_blob_url};

// Storage types appear in this crate's public API
pub use runcmd_storage::{BlobRef, StorageClientConfig, StorageCredential, StorageError};

// Silence unused dev-dependency warnings
#[cfg(test)]
use axum as _;
#[cfg(test)]
use tokio_test as _;
