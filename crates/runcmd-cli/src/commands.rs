//! Subcommands.

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Save or download the configured script, then execute it
    Run {
        /// Path to the handler settings JSON document
        #[arg(short, long)]
        settings: PathBuf,
    },

    /// Download artifacts into the working directory without running them
    Fetch {
        /// URLs or blob URLs to download
        #[arg(required = true)]
        sources: Vec<String>,
    },
}
