//! Error types used throughout the pipeline

use piiveil_common::error::{CommonError, ErrorClassification, ErrorSeverity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for PiiVeil
///
/// Messages never carry raw PII values; callers describe failures by type,
/// offsets and counts.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PiiVeilError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Detection error: {0}")]
    Detection(String),

    #[error("Policy error: {0}")]
    Policy(String),

    #[error("Capability error: {0}")]
    Capability(String),

    #[error("Capability timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Visual redaction incomplete: {0} entities could not be aligned to tokens")]
    IncompleteVisualRedaction(usize),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for PiiVeil operations
pub type Result<T> = std::result::Result<T, PiiVeilError>;

impl From<CommonError> for PiiVeilError {
    fn from(err: CommonError) -> Self {
        let message = err.to_string();
        match err {
            CommonError::Config { .. } => Self::Config(message),
            CommonError::Serialization { .. } | CommonError::Validation { .. } => {
                Self::InvalidInput(message)
            }
            CommonError::Io { .. } => Self::Media(message),
            CommonError::Timeout { .. } => Self::Timeout(message),
            CommonError::Backend { .. } => Self::Capability(message),
            CommonError::NotFound { .. } => Self::NotFound(message),
            CommonError::Internal { .. } => Self::Internal(message),
        }
    }
}

impl ErrorClassification for PiiVeilError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Network(_))
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound(_) => ErrorSeverity::Info,
            Self::Timeout(_) | Self::Network(_) | Self::Capability(_) => ErrorSeverity::Warning,
            Self::Config(_)
            | Self::InvalidInput(_)
            | Self::Detection(_)
            | Self::Policy(_)
            | Self::Media(_)
            | Self::IncompleteVisualRedaction(_) => ErrorSeverity::Error,
            Self::Internal(_) => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    fn retry_after(&self) -> Option<std::time::Duration> {
        None
    }
}

impl PiiVeilError {
    /// Stable label suitable for logging fields.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::Detection(_) => "detection",
            Self::Policy(_) => "policy",
            Self::Capability(_) => "capability",
            Self::Timeout(_) => "timeout",
            Self::Network(_) => "network",
            Self::Media(_) => "media",
            Self::IncompleteVisualRedaction(_) => "incomplete_visual_redaction",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal",
        }
    }
}
