//! Configuration for SAS URL construction.

use std::time::Duration;

/// Signed version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2016-05-31";

/// Configuration for signing blob URLs.
///
/// # Example
///
/// ```
/// use runcmd_storage::StorageClientConfig;
/// use std::time::Duration;
///
/// let config = StorageClientConfig::new()
///     .with_validity(Duration::from_secs(600))
///     .with_https(false);
/// ```
#[derive(Debug, Clone)]
pub struct StorageClientConfig {
    /// Signed version (`sv`) of the SAS scheme
    pub(crate) api_version: String,
    /// How long a signed URL stays valid
    pub(crate) validity: Duration,
    /// Whether blob URLs use https
    pub(crate) use_https: bool,
}

impl Default for StorageClientConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            validity: Duration::from_secs(30 * 60),
            use_https: true,
        }
    }
}

impl StorageClientConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signed version.
    ///
    /// Defaults to `2016-05-31`.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set how long each signed URL remains valid.
    ///
    /// Defaults to 30 minutes.
    #[must_use]
    pub const fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    /// Use https (the default) or plain http for blob URLs.
    #[must_use]
    pub const fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    /// The configured validity window.
    pub const fn validity(&self) -> Duration {
        self.validity
    }
}
