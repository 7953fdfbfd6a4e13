//! Source classification.
//!
//! The selector only decides which [`Downloader`] a source string needs and
//! builds it. Nothing is fetched here.

use reqwest::Client;
use runcmd_storage::{BlobRef, StorageClientConfig, StorageCredential};
use tracing::debug;
use url::Url;

use crate::config::HttpClientConfig;
use crate::downloader::{BlobDownloader, Downloader, UrlDownloader};
use crate::error::{DownloadError, DownloadResult};

/// DNS suffixes of the known Azure storage clouds.
pub const STORAGE_SUFFIXES: &[&str] = &[
    "core.windows.net",
    "core.chinacloudapi.cn",
    "core.usgovcloudapi.net",
    "core.cloudapi.de",
];

/// A source URL recognized as an Azure blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobLocation {
    /// Storage account named by the host.
    pub account: String,
    /// Coordinates of the blob within that account.
    pub blob: BlobRef,
}

/// Recognize `https://<account>.blob.<suffix>/<container>/<blob>`.
///
/// A single path segment addresses a blob in the root container. URLs that
/// already carry a signature (`sig` in the query) are not treated as blobs
/// since they can be fetched as they are.
pub fn classify_blob_url(url: &Url) -> Option<BlobLocation> {
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    if url.query_pairs().any(|(k, _)| k == "sig") {
        return None;
    }

    let host = url.host_str()?.to_ascii_lowercase();
    let (account, storage_base) = host.split_once(".blob.")?;
    if account.is_empty() || !STORAGE_SUFFIXES.contains(&storage_base) {
        return None;
    }

    let segments = url
        .path_segments()?
        .map(|s| urlencoding::decode(s).map(|s| s.into_owned()))
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    let (container, blob_name) = match segments.as_slice() {
        [] => return None,
        [blob] => (String::new(), blob.clone()),
        [container, rest @ ..] => (container.clone(), rest.join("/")),
    };
    if blob_name.is_empty() {
        return None;
    }
    // Explicit `$root` and the bare form address the same container
    let container = if container == runcmd_storage::ROOT_CONTAINER {
        String::new()
    } else {
        container
    };

    Some(BlobLocation {
        account: account.to_string(),
        blob: BlobRef::new(storage_base, container, blob_name),
    })
}

/// Builds one downloader per source string.
///
/// A blob downloader is chosen only when the source is a blob URL of the
/// account the credential belongs to. Everything else, including blobs of
/// other accounts, is fetched verbatim.
#[derive(Debug, Clone)]
pub struct DownloaderSelector {
    client: Client,
    credential: Option<StorageCredential>,
    storage_config: StorageClientConfig,
}

impl DownloaderSelector {
    /// Create a selector with a client built from `config`.
    pub fn new(config: &HttpClientConfig) -> DownloadResult<Self> {
        Ok(Self::from_client(config.build_client()?))
    }

    /// Create a selector that shares an existing client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            credential: None,
            storage_config: StorageClientConfig::default(),
        }
    }

    /// Use `credential` for blob sources of its account.
    #[must_use]
    pub fn with_credential(mut self, credential: StorageCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Override how blob URLs are signed.
    #[must_use]
    pub fn with_storage_config(mut self, config: StorageClientConfig) -> Self {
        self.storage_config = config;
        self
    }

    /// Classify `source` and build its downloader.
    pub fn select(&self, source: &str) -> DownloadResult<Downloader> {
        let url = Url::parse(source).map_err(|e| DownloadError::UrlParse {
            url: source.to_string(),
            source: e,
        })?;

        if let (Some(credential), Some(location)) = (&self.credential, classify_blob_url(&url)) {
            if credential.account_name() == location.account {
                debug!(
                    account = %location.account,
                    container = %location.blob.container_segment(),
                    blob = %location.blob.blob_name,
                    "selected blob downloader"
                );
                return Ok(Downloader::Blob(BlobDownloader::new(
                    self.client.clone(),
                    credential.clone(),
                    location.blob,
                    self.storage_config.clone(),
                )));
            }
            debug!(account = %location.account, "blob belongs to another account, fetching verbatim");
        }

        let downloader = Downloader::Url(UrlDownloader::new(self.client.clone(), source)?);
        debug!(source = %downloader.describe(), "selected url downloader");
        Ok(downloader)
    }

    /// Build downloaders for several sources, keeping their order.
    pub fn select_all<S: AsRef<str>>(&self, sources: &[S]) -> DownloadResult<Vec<Downloader>> {
        sources.iter().map(|s| self.select(s.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "Zm9vCg==";

    fn selector() -> DownloaderSelector {
        DownloaderSelector::from_client(Client::new())
            .with_credential(StorageCredential::new("acct", KEY))
    }

    fn parse(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_classify_container_blob() {
        let location =
            classify_blob_url(&parse("https://acct.blob.core.windows.net/scripts/dir/run.sh"))
                .unwrap();
        assert_eq!(location.account, "acct");
        assert_eq!(
            location.blob,
            BlobRef::new("core.windows.net", "scripts", "dir/run.sh")
        );
    }

    #[test]
    fn test_classify_root_container() {
        for source in [
            "https://acct.blob.core.windows.net/run.sh",
            "https://acct.blob.core.windows.net/$root/run.sh",
        ] {
            let location = classify_blob_url(&parse(source)).unwrap();
            assert_eq!(location.blob, BlobRef::new("core.windows.net", "", "run.sh"));
            assert_eq!(location.blob.container_segment(), "$root");
        }
    }

    #[test]
    fn test_classify_decodes_blob_name() {
        let location = classify_blob_url(&parse(
            "https://acct.blob.core.chinacloudapi.cn/c/run%20me.sh",
        ))
        .unwrap();
        assert_eq!(location.blob.blob_name, "run me.sh");
        assert_eq!(location.blob.storage_base, "core.chinacloudapi.cn");
    }

    #[test]
    fn test_classify_rejects_non_blob_urls() {
        let cases = [
            "https://example.com/scripts/run.sh",
            "https://acct.blob.example.com/scripts/run.sh",
            "https://acct.file.core.windows.net/share/run.sh",
            "https://acct.blob.core.windows.net/",
            "https://acct.blob.core.windows.net/scripts/",
            "https://acct.blob.core.windows.net/scripts/run.sh?sv=2016-05-31&sig=abc",
            "ftp://acct.blob.core.windows.net/scripts/run.sh",
        ];
        for source in cases {
            assert!(classify_blob_url(&parse(source)).is_none(), "url={source}");
        }
    }

    #[test]
    fn test_select_blob_for_matching_account() {
        let d = selector()
            .select("https://acct.blob.core.windows.net/scripts/run.sh")
            .unwrap();
        assert_eq!(d.kind(), "blob");
        assert_eq!(d.file_name().unwrap(), "run.sh");
    }

    #[test]
    fn test_select_url_without_credential() {
        let d = DownloaderSelector::from_client(Client::new())
            .select("https://acct.blob.core.windows.net/scripts/run.sh")
            .unwrap();
        assert_eq!(d.kind(), "url");
    }

    #[test]
    fn test_select_url_for_other_account() {
        let d = selector()
            .select("https://other.blob.core.windows.net/scripts/run.sh")
            .unwrap();
        assert_eq!(d.kind(), "url");
    }

    #[test]
    fn test_select_url_for_presigned_blob() {
        let source = "https://acct.blob.core.windows.net/scripts/run.sh?sv=2016-05-31&sig=abc";
        let d = selector().select(source).unwrap();
        assert_eq!(d.kind(), "url");
        assert_eq!(d.build_request().unwrap().url().as_str(), source);
    }

    #[test]
    fn test_select_url_for_account_root() {
        let d = selector().select("http://acct.blob.core.windows.net/").unwrap();
        assert_eq!(d.kind(), "url");
    }

    #[test]
    fn test_select_rejects_invalid_source() {
        let err = selector().select("not a url").unwrap_err();
        assert!(matches!(err, DownloadError::UrlParse { .. }));

        let err = selector().select("file:///etc/passwd").unwrap_err();
        assert!(matches!(err, DownloadError::UnsupportedScheme { .. }));
    }

    #[test]
    fn test_select_all_keeps_order() {
        let downloaders = selector()
            .select_all(&[
                "https://example.com/a.sh",
                "https://acct.blob.core.windows.net/c/b.sh",
                "https://example.com/c.sh",
            ])
            .unwrap();

        let kinds: Vec<_> = downloaders.iter().map(Downloader::kind).collect();
        assert_eq!(kinds, ["url", "blob", "url"]);
        let names: Vec<_> = downloaders
            .iter()
            .map(|d| d.file_name().unwrap())
            .collect();
        assert_eq!(names, ["a.sh", "b.sh", "c.sh"]);
    }
}
