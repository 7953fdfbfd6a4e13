//! Plain URL downloader.

use reqwest::{Client, Request};
use url::Url;

use crate::error::{DownloadError, DownloadResult};
use crate::materialize::url_to_file_name;

/// Fetches an http(s) URL verbatim, without signing.
#[derive(Debug, Clone)]
pub struct UrlDownloader {
    pub(super) client: Client,
    url: Url,
}

impl UrlDownloader {
    /// Parse `source` and create a downloader for it.
    pub fn new(client: Client, source: &str) -> DownloadResult<Self> {
        let url = Url::parse(source).map_err(|source_err| DownloadError::UrlParse {
            url: source.to_string(),
            source: source_err,
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(DownloadError::UnsupportedScheme {
                scheme: url.scheme().to_string(),
                url: source.to_string(),
            });
        }

        Ok(Self { client, url })
    }

    /// The URL this downloader fetches.
    pub const fn url(&self) -> &Url {
        &self.url
    }

    pub(super) fn build_request(&self) -> DownloadResult<Request> {
        self.client
            .get(self.url.clone())
            .build()
            .map_err(DownloadError::Request)
    }

    pub(super) fn file_name(&self) -> DownloadResult<String> {
        url_to_file_name(self.url.as_str())
    }

    /// The URL without query or fragment, which may hold a token.
    pub(super) fn describe(&self) -> String {
        let mut url = self.url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::Downloader;

    #[test]
    fn test_new_rejects_unparseable_url() {
        let err = UrlDownloader::new(Client::new(), "not a url").unwrap_err();
        assert!(matches!(err, DownloadError::UrlParse { .. }));
        assert!(err.to_string().contains(r#"unable to parse URL: "not a url""#));
    }

    #[test]
    fn test_new_rejects_non_http_scheme() {
        let err = UrlDownloader::new(Client::new(), "ftp://example.com/run.sh").unwrap_err();
        assert!(matches!(err, DownloadError::UnsupportedScheme { .. }));
    }

    #[test]
    fn test_build_request_is_verbatim() {
        let source = "https://example.com/path/run.sh?token=abc";
        let d = Downloader::Url(UrlDownloader::new(Client::new(), source).unwrap());

        let request = d.build_request().unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().as_str(), source);
        assert_eq!(d.kind(), "url");
    }

    #[test]
    fn test_describe_strips_query() {
        let d = UrlDownloader::new(Client::new(), "https://example.com/run.sh?sig=secret#frag")
            .unwrap();
        assert_eq!(d.describe(), "https://example.com/run.sh");
    }

    #[test]
    fn test_file_name() {
        let d = UrlDownloader::new(Client::new(), "https://example.com/a/b/run.sh?x=1").unwrap();
        assert_eq!(d.file_name().unwrap(), "run.sh");
    }
}
