//! Main CLI parser and global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Download a script or artifact and run it.
#[derive(Debug, Parser)]
#[command(name = "runcmd")]
#[command(about = "Download a script or artifact and run it")]
#[command(version)]
pub struct Cli {
    /// Working directory for downloads and captured output
    #[arg(long, env = "RUNCMD_WORKDIR", global = true, default_value = ".")]
    pub workdir: PathBuf,

    /// Storage account used to sign blob downloads
    #[arg(long = "storage-account", env = "RUNCMD_STORAGE_ACCOUNT", global = true)]
    pub storage_account: Option<String>,

    /// Base64 access key of the storage account
    #[arg(
        long = "storage-key",
        env = "RUNCMD_STORAGE_KEY",
        global = true,
        hide_env_values = true
    )]
    pub storage_key: Option<String>,

    /// Bound every download to this many seconds
    #[arg(long = "http-timeout", global = true, value_name = "SECONDS")]
    pub http_timeout: Option<u64>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from([
            "runcmd",
            "--verbose",
            "run",
            "--settings",
            "/etc/runcmd/settings.json",
            "--workdir",
            "/tmp/work",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.workdir, PathBuf::from("/tmp/work"));
        match cli.command {
            Commands::Run { settings } => {
                assert_eq!(settings, PathBuf::from("/etc/runcmd/settings.json"));
            }
            Commands::Fetch { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn test_fetch_command() {
        let cli = Cli::parse_from([
            "runcmd",
            "fetch",
            "https://example.com/a.sh",
            "https://example.com/b.sh",
            "--http-timeout",
            "30",
        ]);
        assert_eq!(cli.http_timeout, Some(30));
        match cli.command {
            Commands::Fetch { sources } => assert_eq!(sources.len(), 2),
            Commands::Run { .. } => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_fetch_requires_a_source() {
        assert!(Cli::try_parse_from(["runcmd", "fetch"]).is_err());
    }
}
