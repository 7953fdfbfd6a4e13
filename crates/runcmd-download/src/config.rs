//! HTTP client configuration.

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{DownloadError, DownloadResult};

/// Configuration for the HTTP client shared by all downloaders.
///
/// No request timeout is set by default: a download may block until the
/// transport gives up.
///
/// # Example
///
/// ```
/// use runcmd_download::HttpClientConfig;
/// use std::time::Duration;
///
/// let client = HttpClientConfig::new()
///     .with_timeout(Duration::from_secs(120))
///     .with_user_agent("my-agent/1.0")
///     .build_client()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Whole-request timeout
    pub(crate) timeout: Option<Duration>,
    /// Connection establishment timeout
    pub(crate) connect_timeout: Option<Duration>,
    /// Static DNS overrides
    pub(crate) resolve: Vec<(String, SocketAddr)>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("runcmd/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
            connect_timeout: None,
            resolve: Vec::new(),
        }
    }
}

impl HttpClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Bound the whole request, body included.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Bound connection establishment only.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Resolve `domain` to `addr` instead of asking DNS.
    ///
    /// The port of `addr` is ignored; the port comes from the request URL.
    #[must_use]
    pub fn with_resolve(mut self, domain: impl Into<String>, addr: SocketAddr) -> Self {
        self.resolve.push((domain.into(), addr));
        self
    }

    /// Build the reqwest client.
    pub fn build_client(&self) -> DownloadResult<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        for (domain, addr) in &self.resolve {
            builder = builder.resolve(domain, *addr);
        }

        builder.build().map_err(DownloadError::Client)
    }
}
