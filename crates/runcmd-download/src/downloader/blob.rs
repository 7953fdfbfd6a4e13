//! Azure blob downloader.

use reqwest::{Client, Request};
use runcmd_storage::{BlobRef, SasUrlBuilder, SignedUrl, StorageClientConfig, StorageCredential};
use tracing::debug;

use crate::error::{DownloadError, DownloadResult};

/// Downloads a blob through a freshly signed SAS URL.
///
/// Construction never fails. Invalid credentials or coordinates surface
/// from [`BlobDownloader::build_request`] as [`DownloadError::Init`].
#[derive(Debug, Clone)]
pub struct BlobDownloader {
    pub(super) client: Client,
    credential: StorageCredential,
    blob: BlobRef,
    signer: SasUrlBuilder,
}

impl BlobDownloader {
    pub fn new(
        client: Client,
        credential: StorageCredential,
        blob: BlobRef,
        config: StorageClientConfig,
    ) -> Self {
        Self {
            client,
            credential,
            blob,
            signer: SasUrlBuilder::new(config),
        }
    }

    /// The blob this downloader fetches.
    pub const fn blob(&self) -> &BlobRef {
        &self.blob
    }

    /// Sign a read URL for the blob.
    pub fn signed_url(&self) -> DownloadResult<SignedUrl> {
        self.signer
            .build(&self.credential, &self.blob)
            .map_err(DownloadError::Init)
    }

    pub(super) fn build_request(&self) -> DownloadResult<Request> {
        let signed = self.signed_url()?;
        debug!(url = %signed.redacted(), expiry = %signed.expiry, "signed blob request");

        self.client
            .get(signed.url)
            .build()
            .map_err(|e| DownloadError::Request(e.without_url()))
    }

    /// Last `/`-separated component of the blob name.
    pub(super) fn file_name(&self) -> DownloadResult<String> {
        self.blob
            .blob_name
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
            .map(str::to_string)
            .ok_or_else(|| DownloadError::NoFileName {
                url: self.describe(),
            })
    }

    pub(super) fn describe(&self) -> String {
        format!(
            "blob {}/{}/{}",
            self.credential.account_name(),
            self.blob.container_segment(),
            self.blob.blob_name
        )
    }
}
