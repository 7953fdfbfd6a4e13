//! Core domain types for runcmd.
//!
//! This crate holds the pure data shared by the download and execution
//! layers: the handler settings document, the parameter list and the
//! per-invocation execution settings. It has no I/O beyond reading a
//! settings file.

#![deny(unused_crate_dependencies)]

pub mod parameters;
pub mod settings;

pub use parameters::{ExecutionSettings, ParameterDefinition};
pub use settings::{
    HandlerSettings, ProtectedSettings, PublicSettings, ScriptSource, SettingsError,
    SettingsResult,
};
