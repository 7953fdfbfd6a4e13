//! Download sources.
//!
//! Every source kind is one variant of [`Downloader`]. Each variant knows how
//! to build its GET request; sending it and validating the response is
//! shared. New kinds of source are added as new variants.

mod blob;
mod external;

use std::fmt;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use reqwest::header::HeaderMap;
use reqwest::{Client, Request};
use tracing::{debug, warn};

use crate::error::{DownloadError, DownloadResult};

pub use blob::BlobDownloader;
pub use external::UrlDownloader;

/// Lazily read response body. Dropping it releases the connection.
pub type BodyStream = Pin<Box<dyn Stream<Item = DownloadResult<Bytes>> + Send>>;

/// A downloader for one source.
#[derive(Debug, Clone)]
pub enum Downloader {
    /// Signs a request for an Azure blob with the account key.
    Blob(BlobDownloader),
    /// Fetches an arbitrary http(s) URL verbatim.
    Url(UrlDownloader),
}

impl Downloader {
    /// Build the GET request for this source.
    ///
    /// Blob requests are signed here, so each call yields a fresh signature.
    pub fn build_request(&self) -> DownloadResult<Request> {
        match self {
            Self::Blob(d) => d.build_request(),
            Self::Url(d) => d.build_request(),
        }
    }

    /// Send `request` and validate the response status.
    ///
    /// On success the caller owns the returned body. On a non-2xx status the
    /// response is dropped before the error is returned.
    pub async fn execute(&self, request: Request) -> DownloadResult<DownloadOutcome> {
        let redact = self.is_signed();
        let response = self.client().execute(request).await.map_err(|e| {
            DownloadError::Transport(if redact { e.without_url() } else { e })
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(source = %self.describe(), status = status.as_u16(), "download rejected");
            drop(response);
            return Err(DownloadError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        debug!(
            source = %self.describe(),
            status = status.as_u16(),
            content_length = ?response.content_length(),
            "download response received"
        );
        Ok(DownloadOutcome::from_response(response, redact))
    }

    /// File name the artifact is saved under.
    pub fn file_name(&self) -> DownloadResult<String> {
        match self {
            Self::Blob(d) => d.file_name(),
            Self::Url(d) => d.file_name(),
        }
    }

    /// Description of the source that is safe to log.
    pub fn describe(&self) -> String {
        match self {
            Self::Blob(d) => d.describe(),
            Self::Url(d) => d.describe(),
        }
    }

    /// Short name of the variant.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Blob(_) => "blob",
            Self::Url(_) => "url",
        }
    }

    const fn client(&self) -> &Client {
        match self {
            Self::Blob(d) => &d.client,
            Self::Url(d) => &d.client,
        }
    }

    /// Whether request URLs carry secrets that must stay out of errors.
    const fn is_signed(&self) -> bool {
        matches!(self, Self::Blob(_))
    }
}

/// Build the request for `downloader` and execute it.
pub async fn download(downloader: &Downloader) -> DownloadResult<DownloadOutcome> {
    let request = downloader.build_request()?;
    downloader.execute(request).await
}

/// A successful (2xx) response.
pub struct DownloadOutcome {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body; the caller owns it.
    pub body: BodyStream,
}

impl DownloadOutcome {
    fn from_response(response: reqwest::Response, redact: bool) -> Self {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes_stream().map(move |chunk| {
            chunk.map_err(|e| DownloadError::Body(if redact { e.without_url() } else { e }))
        });

        Self {
            status,
            headers,
            body: Box::pin(body),
        }
    }

    /// Value of the `Content-Length` header, if present and numeric.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }

    /// Read the whole body into memory.
    pub async fn bytes(mut self) -> DownloadResult<Bytes> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}

impl fmt::Debug for DownloadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadOutcome")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
