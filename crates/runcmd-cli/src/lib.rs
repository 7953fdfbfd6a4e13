//! Library side of the `runcmd` binary.
//!
//! `main.rs` is the composition root; everything it wires together lives
//! here so it can be tested without spawning the binary.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings
#[cfg(test)]
use axum as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;

// Used by main.rs only
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use bootstrap::CliConfig;
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
