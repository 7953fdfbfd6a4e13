//! Shared-access-signature URL construction.
//!
//! Produces read-only service SAS URLs for a single blob. A fresh signature
//! is computed on every call; nothing is cached.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

use crate::account::StorageCredential;
use crate::blob::BlobRef;
use crate::config::StorageClientConfig;
use crate::error::{StorageError, StorageResult};

type HmacSha256 = Hmac<Sha256>;

/// Signed resource type: a single blob.
const SIGNED_RESOURCE_BLOB: &str = "b";

/// Signed permissions: read only.
const SIGNED_PERMISSION_READ: &str = "r";

/// A signed, time-bounded GET URL for one blob.
#[derive(Debug, Clone)]
pub struct SignedUrl {
    /// Fully qualified URL including the SAS query.
    pub url: Url,
    /// Instant after which the signature is rejected.
    pub expiry: DateTime<Utc>,
}

impl SignedUrl {
    /// The URL without its query string, safe to log.
    pub fn redacted(&self) -> String {
        let mut url = self.url.clone();
        url.set_query(None);
        url.to_string()
    }
}

/// Sign a read URL for `blob` that stays valid for `validity`.
///
/// Uses the default signed version and https.
pub fn build_signed_url(
    credential: &StorageCredential,
    blob: &BlobRef,
    validity: Duration,
) -> StorageResult<Url> {
    SasUrlBuilder::new(StorageClientConfig::new().with_validity(validity))
        .build(credential, blob)
        .map(|signed| signed.url)
}

/// Builds signed blob URLs according to a [`StorageClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct SasUrlBuilder {
    config: StorageClientConfig,
}

impl SasUrlBuilder {
    pub const fn new(config: StorageClientConfig) -> Self {
        Self { config }
    }

    /// Sign a URL expiring one validity window from now.
    pub fn build(&self, credential: &StorageCredential, blob: &BlobRef) -> StorageResult<SignedUrl> {
        let validity = TimeDelta::from_std(self.config.validity)
            .map_err(|e| StorageError::Signing(format!("validity window out of range: {e}")))?;
        self.build_with_expiry(credential, blob, Utc::now() + validity)
    }

    /// Sign a URL with an explicit expiry.
    pub fn build_with_expiry(
        &self,
        credential: &StorageCredential,
        blob: &BlobRef,
        expiry: DateTime<Utc>,
    ) -> StorageResult<SignedUrl> {
        let key = credential.signing_key()?;

        if blob.blob_name.is_empty() {
            return Err(StorageError::MissingBlobName);
        }

        let mut url = self.blob_url(credential.account_name(), blob)?;

        let signed_expiry = expiry.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let protocol = if self.config.use_https {
            "https"
        } else {
            "https,http"
        };
        let canonical_resource = format!(
            "/blob/{}/{}/{}",
            credential.account_name(),
            blob.container_segment(),
            blob.blob_name
        );

        // signedpermissions, signedstart, signedexpiry, canonicalizedresource,
        // signedidentifier, signedIP, signedProtocol, signedversion, then the
        // five response header overrides (rscc, rscd, rsce, rscl, rsct).
        let string_to_sign = [
            SIGNED_PERMISSION_READ,
            "",
            &signed_expiry,
            &canonical_resource,
            "",
            "",
            protocol,
            &self.config.api_version,
            "",
            "",
            "",
            "",
            "",
        ]
        .join("\n");

        let signature = sign(&key, &string_to_sign)?;

        url.query_pairs_mut()
            .append_pair("sv", &self.config.api_version)
            .append_pair("se", &signed_expiry)
            .append_pair("sr", SIGNED_RESOURCE_BLOB)
            .append_pair("sp", SIGNED_PERMISSION_READ)
            .append_pair("spr", protocol)
            .append_pair("sig", &signature);

        Ok(SignedUrl { url, expiry })
    }

    /// Unsigned URL of the blob: `<scheme>://<account>.blob.<base>/<container>/<blob>`.
    fn blob_url(&self, account: &str, blob: &BlobRef) -> StorageResult<Url> {
        let base = blob.storage_base.trim();
        if base.is_empty() {
            return Err(StorageError::InvalidEndpoint {
                reason: "storage base is empty".to_string(),
            });
        }
        if base.contains(['/', '?', '#', '@']) {
            return Err(StorageError::InvalidEndpoint {
                reason: format!("unexpected character in storage base {base:?}"),
            });
        }

        let scheme = if self.config.use_https { "https" } else { "http" };
        let mut url = Url::parse(&format!("{scheme}://{account}.blob.{base}/")).map_err(|e| {
            StorageError::InvalidEndpoint {
                reason: format!("{e}: {base:?}"),
            }
        })?;

        url.path_segments_mut()
            .map_err(|()| StorageError::InvalidEndpoint {
                reason: format!("storage base {base:?} cannot carry a path"),
            })?
            .pop_if_empty()
            .push(blob.container_segment())
            .extend(blob.blob_name.split('/'));

        Ok(url)
    }
}

fn sign(key: &[u8], string_to_sign: &str) -> StorageResult<String> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| StorageError::Signing(e.to_string()))?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
