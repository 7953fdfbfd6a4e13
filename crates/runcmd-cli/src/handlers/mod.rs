//! Command handlers.
//!
//! Each handler takes the resolved [`CliConfig`](crate::CliConfig) and the
//! subcommand's arguments, and returns a typed result for `main` to report.

pub mod fetch;
pub mod run;
