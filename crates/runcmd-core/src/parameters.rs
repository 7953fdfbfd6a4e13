//! Parameter and execution settings types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single script parameter.
///
/// Named parameters become environment variables of the child process;
/// unnamed parameters are appended to the command line in list order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParameterDefinition {
    /// Environment variable name, empty for a positional argument.
    pub name: String,
    /// Parameter value.
    pub value: String,
}

impl ParameterDefinition {
    /// Create a named parameter (applied as an environment variable).
    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create an unnamed parameter (appended as a command argument).
    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            value: value.into(),
        }
    }

    /// Whether this parameter is applied as an environment variable.
    pub const fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Settings that drive a single command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionSettings {
    /// Deadline in seconds, 0 disables the deadline.
    pub timeout_seconds: u64,
    /// User to run the command as, empty keeps the current identity.
    pub run_as_user: String,
}

impl ExecutionSettings {
    /// Create settings with a deadline and no privilege drop.
    pub fn with_timeout(timeout_seconds: u64) -> Self {
        Self {
            timeout_seconds,
            ..Self::default()
        }
    }

    /// Set the user to run the command as.
    #[must_use]
    pub fn run_as(mut self, user: impl Into<String>) -> Self {
        self.run_as_user = user.into();
        self
    }

    /// The configured deadline, `None` when disabled.
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_seconds))
        }
    }

    /// The user to drop privileges to, `None` when unset.
    pub fn run_as_user(&self) -> Option<&str> {
        let user = self.run_as_user.trim();
        if user.is_empty() { None } else { Some(user) }
    }
}
