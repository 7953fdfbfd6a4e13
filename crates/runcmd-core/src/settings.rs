//! Handler settings document.
//!
//! The settings are split into a public part and a protected part. The
//! protected part carries secrets (storage key, protected parameters) and
//! must never be logged.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parameters::{ExecutionSettings, ParameterDefinition};

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Errors that can occur while loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid JSON for this schema.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// Neither an inline script nor a script URI was given.
    #[error("either 'script' or 'scriptUri' must be specified")]
    MissingSource,

    /// Both an inline script and a script URI were given.
    #[error("'script' and 'scriptUri' are mutually exclusive")]
    ConflictingSource,
}

/// Where the command to execute comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ScriptSource {
    /// Inline script content.
    pub script: Option<String>,
    /// URL of a script or archive to download.
    pub script_uri: Option<String>,
}

/// Public (non-secret) settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PublicSettings {
    pub source: ScriptSource,
    pub parameters: Vec<ParameterDefinition>,
    pub timeout_in_seconds: u64,
    pub run_as_user: String,
}

/// Protected (secret) settings.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtectedSettings {
    pub protected_parameters: Vec<ParameterDefinition>,
    pub storage_account_name: String,
    pub storage_account_key: String,
}

impl fmt::Debug for ProtectedSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtectedSettings")
            .field("protected_parameters", &self.protected_parameters.len())
            .field("storage_account_name", &self.storage_account_name)
            .field("storage_account_key", &"<redacted>")
            .finish()
    }
}

/// The full settings document handed to the handler.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct HandlerSettings {
    pub public_settings: PublicSettings,
    pub protected_settings: ProtectedSettings,
}

impl HandlerSettings {
    /// Parse and validate a settings document.
    pub fn from_json(json: &str) -> SettingsResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a settings file.
    pub fn load(path: &Path) -> SettingsResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Check that exactly one script source is configured.
    pub fn validate(&self) -> SettingsResult<()> {
        match (self.script(), self.script_uri()) {
            (None, None) => Err(SettingsError::MissingSource),
            (Some(_), Some(_)) => Err(SettingsError::ConflictingSource),
            _ => Ok(()),
        }
    }

    /// Inline script content, if any.
    pub fn script(&self) -> Option<&str> {
        non_empty(self.public_settings.source.script.as_deref())
    }

    /// Script URI, if any.
    pub fn script_uri(&self) -> Option<&str> {
        non_empty(self.public_settings.source.script_uri.as_deref())
    }

    /// All parameters: public ones first, then protected ones.
    ///
    /// The order decides both the command-argument order and which value
    /// wins when the same environment variable is named twice (the later one).
    pub fn parameters(&self) -> Vec<ParameterDefinition> {
        self.public_settings
            .parameters
            .iter()
            .chain(&self.protected_settings.protected_parameters)
            .cloned()
            .collect()
    }

    /// Execution settings for this invocation.
    pub fn execution_settings(&self) -> ExecutionSettings {
        ExecutionSettings {
            timeout_seconds: self.public_settings.timeout_in_seconds,
            run_as_user: self.public_settings.run_as_user.clone(),
        }
    }

    /// Storage account name and key, when both are configured.
    pub fn storage_account(&self) -> Option<(&str, &str)> {
        let name = self.protected_settings.storage_account_name.trim();
        let key = self.protected_settings.storage_account_key.trim();
        if name.is_empty() || key.is_empty() {
            None
        } else {
            Some((name, key))
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
