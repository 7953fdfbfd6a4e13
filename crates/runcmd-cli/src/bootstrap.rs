//! CLI configuration assembled from flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use runcmd_download::{DownloaderSelector, HttpClientConfig, StorageCredential};
use runcmd_runtime::CommandExecutor;
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Everything a handler needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory for artifacts and captured output.
    pub work_dir: PathBuf,
    /// HTTP client settings shared by all downloads.
    pub http: HttpClientConfig,
    /// Storage credential given on the command line or in the environment.
    pub credential: Option<StorageCredential>,
    /// Executor used by `run`.
    pub executor: CommandExecutor,
}

impl CliConfig {
    /// Create a configuration with defaults for everything but `work_dir`.
    ///
    /// A relative `work_dir` is resolved against the current directory.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        Self {
            work_dir: std::path::absolute(&work_dir).unwrap_or(work_dir),
            http: HttpClientConfig::new(),
            credential: None,
            executor: CommandExecutor::new(),
        }
    }

    /// Resolve the configuration from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut config = Self::new(cli.workdir.clone());

        if let Some(secs) = cli.http_timeout {
            config.http = config.http.with_timeout(Duration::from_secs(secs));
        }

        config.credential = match (&cli.storage_account, &cli.storage_key) {
            (Some(account), Some(key)) => Some(StorageCredential::new(account, key)),
            (None, None) => None,
            _ => {
                return Err(CliError::Arguments(
                    "--storage-account and --storage-key must be given together".to_string(),
                ));
            }
        };

        Ok(config)
    }

    /// Build a selector, preferring `settings_account` over the configured
    /// credential.
    pub fn selector(
        &self,
        settings_account: Option<(&str, &str)>,
    ) -> Result<DownloaderSelector, CliError> {
        let selector = DownloaderSelector::new(&self.http)?;

        let credential = settings_account
            .map(|(name, key)| StorageCredential::new(name, key))
            .or_else(|| self.credential.clone());

        Ok(match credential {
            Some(credential) => {
                debug!(account = credential.account_name(), "blob signing enabled");
                selector.with_credential(credential)
            }
            None => selector,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_cli_defaults() {
        let cli = Cli::parse_from(["runcmd", "--workdir", "/tmp/w", "fetch", "http://x/a"]);
        let config = CliConfig::from_cli(&cli).unwrap();
        assert_eq!(config.work_dir, PathBuf::from("/tmp/w"));
    }

    #[test]
    fn test_relative_work_dir_is_made_absolute() {
        let cli = Cli::parse_from(["runcmd", "--workdir", "w", "fetch", "http://x/a"]);
        let config = CliConfig::from_cli(&cli).unwrap();
        assert!(config.work_dir.is_absolute());
        assert_eq!(config.work_dir, std::env::current_dir().unwrap().join("w"));
    }

    #[test]
    fn test_from_cli_rejects_half_credential() {
        let cli = Cli::parse_from(["runcmd", "--storage-account", "acct", "fetch", "http://x/a"]);
        let err = CliConfig::from_cli(&cli).unwrap_err();
        assert!(matches!(err, CliError::Arguments(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_settings_account_wins() {
        let mut config = CliConfig::new("/tmp/w");
        config.credential = Some(StorageCredential::new("flagacct", "Zm9vCg=="));

        let selector = config.selector(Some(("acct", "Zm9vCg=="))).unwrap();
        let downloader = selector
            .select("https://acct.blob.core.windows.net/c/run.sh")
            .unwrap();
        assert_eq!(downloader.kind(), "blob");

        let selector = config.selector(None).unwrap();
        let downloader = selector
            .select("https://acct.blob.core.windows.net/c/run.sh")
            .unwrap();
        assert_eq!(downloader.kind(), "url");
    }
}
