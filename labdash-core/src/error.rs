//! Error types for the labdash core library.
//!
//! Two families live here. [`InfraError`] is the tagged failure of a single
//! provisioning-tool invocation; the snapshot pipeline turns it into a message
//! and never lets it escape. [`LabdashError`] covers everything around the
//! pipeline (configuration and serialization).
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E1001-E1099 | Config | Config file, environment, and validation errors |
//! | E2001-E2099 | Infra | Provisioning tool launch, exit, timeout, output errors |
//! | E9001-E9099 | General | Serialization errors |

use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

/// Failure of one provisioning-tool invocation.
#[derive(Debug, Error)]
pub enum InfraError {
    /// The tool could not be started at all (not found, not executable).
    #[error("[E2001] Failed to launch '{program}': {message}")]
    ProcessLaunch { program: String, message: String },

    /// The tool ran and reported failure.
    #[error("[E2002] '{command}' exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The tool did not finish within its bound and was killed.
    #[error("[E2003] '{command}' timed out after {}ms", .timeout.as_millis())]
    Timeout { command: String, timeout: Duration },

    /// Standard output was not valid JSON, or not the expected shape.
    #[error("[E2004] Malformed output from '{command}': {message}")]
    MalformedOutput { command: String, message: String },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

pub type InfraResult<T> = Result<T, InfraError>;

impl InfraError {
    pub fn error_code(&self) -> &'static str {
        match self {
            InfraError::ProcessLaunch { .. } => "E2001",
            InfraError::NonZeroExit { .. } => "E2002",
            InfraError::Timeout { .. } => "E2003",
            InfraError::MalformedOutput { .. } => "E2004",
        }
    }

    /// A later refresh may succeed without operator action.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            InfraError::Timeout { .. } | InfraError::NonZeroExit { .. }
        )
    }

    /// The human-readable message placed in a degraded snapshot.
    pub fn snapshot_message(&self) -> String {
        match self {
            InfraError::NonZeroExit { .. } => "Failed to get Terraform output".to_string(),
            InfraError::Timeout { .. } => "Terraform command timed out".to_string(),
            InfraError::MalformedOutput { .. } => "Invalid JSON from Terraform output".to_string(),
            InfraError::ProcessLaunch { message, .. } => {
                format!("Unexpected error: {}", message)
            }
        }
    }

    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            InfraError::ProcessLaunch { .. } => {
                Some("Install terraform or set terraform.binary in labdash.toml")
            }
            InfraError::NonZeroExit { .. } => {
                Some("Run 'terraform init' in the terraform directory and apply the session")
            }
            InfraError::Timeout { .. } => {
                Some("Raise terraform.clusters_timeout_secs if the state backend is slow")
            }
            InfraError::MalformedOutput { .. } => None,
        }
    }

    pub fn log(&self) {
        let code = self.error_code();
        if self.is_transient() {
            warn!(error_code = %code, "Transient provisioning error: {}", self);
        } else {
            error!(error_code = %code, "Provisioning error: {}", self);
        }
    }
}

/// The main error type for everything outside the snapshot pipeline.
#[derive(Debug, Error)]
pub enum LabdashError {
    // ========================================================================
    // Configuration Errors (E1001-E1099)
    // ========================================================================
    /// Configuration file parse error
    #[error("[E1001] Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// Invalid configuration value
    #[error("[E1002] Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    /// Required configuration is missing
    #[error("[E1003] Missing required configuration: {0}")]
    MissingConfig(String),

    // ========================================================================
    // General Errors (E9001-E9099)
    // ========================================================================
    /// Serialization/deserialization error
    #[error("[E9006] Serialization error: {0}")]
    SerializationError(String),
}

pub type LabdashResult<T> = Result<T, LabdashError>;

impl From<crate::config::ConfigLoadError> for LabdashError {
    fn from(err: crate::config::ConfigLoadError) -> Self {
        use crate::config::ConfigLoadError;
        match err {
            ConfigLoadError::Config(e) => LabdashError::ConfigParseError(e.to_string()),
            ConfigLoadError::MissingRequired(key) => LabdashError::MissingConfig(key),
            ConfigLoadError::InvalidValue { key, message } => {
                LabdashError::InvalidConfigValue { key, message }
            }
        }
    }
}

impl LabdashError {
    pub fn error_code(&self) -> &'static str {
        match self {
            LabdashError::ConfigParseError(_) => "E1001",
            LabdashError::InvalidConfigValue { .. } => "E1002",
            LabdashError::MissingConfig(_) => "E1003",
            LabdashError::SerializationError(_) => "E9006",
        }
    }

    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            LabdashError::ConfigParseError(_) => {
                Some("Check labdash.toml and LABDASH__* variables for syntax errors")
            }
            _ => None,
        }
    }
}

/// Format an error for CLI display with its suggestion.
pub struct CliErrorDisplay<'a> {
    error: &'a LabdashError,
}

impl<'a> CliErrorDisplay<'a> {
    pub fn new(error: &'a LabdashError) -> Self {
        Self { error }
    }
}

impl<'a> fmt::Display for CliErrorDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.error)?;

        if let Some(suggestion) = self.error.user_suggestion() {
            writeln!(f)?;
            writeln!(f, "  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}
