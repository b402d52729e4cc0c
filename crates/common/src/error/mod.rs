//! Shared error vocabulary for every PiiVeil crate
//!
//! Three pieces:
//!
//! 1. **`CommonError`**: failure shapes that recur across layers, chiefly
//!    deadlines around capability calls and backend failures reported by
//!    them.
//! 2. **`ErrorClassification`**: retryability, severity and criticality, so
//!    callers can decide between retrying, degrading and aborting without
//!    matching on concrete types.
//! 3. **`impl_error_classification!`**: classification for a layer error
//!    that wraps an already-classified error in one of its variants.
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | `Config` | invalid or missing settings |
//! | `Serialization` | JSON/TOML payloads do not parse |
//! | `Io` | local file access fails |
//! | `Timeout` | a capability call missed its deadline |
//! | `Backend` | a capability answered with a failure |
//! | `Validation` | an input violates a constraint |
//! | `NotFound` | a named resource is missing |
//! | `Internal` | an invariant was broken |

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Error variants shared across layers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error ({format}): {message}")]
    Serialization { format: &'static str, message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout { operation: String, duration: Duration },

    #[error("Backend error from '{service}': {message}")]
    Backend { service: String, message: String, is_retryable: bool },

    #[error("Validation error for field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CommonError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn serialization(format: &'static str, message: impl Into<String>) -> Self {
        Self::Serialization { format, message: message.into() }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io { message: message.into() }
    }

    /// Deadline missed by `operation` after `duration`.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout { operation: operation.into(), duration }
    }

    pub fn backend(service: impl Into<String>, message: impl Into<String>, is_retryable: bool) -> Self {
        Self::Backend { service: service.into(), message: message.into(), is_retryable }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Stable label for structured logging
    pub const fn error_type_name(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Serialization { .. } => "serialization",
            Self::Io { .. } => "io",
            Self::Timeout { .. } => "timeout",
            Self::Backend { .. } => "backend",
            Self::Validation { .. } => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Error classification trait for consistent error handling across crates
pub trait ErrorClassification {
    /// True for transient failures worth another attempt: deadlines,
    /// refused connections, upstream 5xx.
    fn is_retryable(&self) -> bool;

    fn severity(&self) -> ErrorSeverity;

    /// True when the failure points at a bug rather than the environment.
    fn is_critical(&self) -> bool;

    /// Suggested delay before retrying, when the source provides one.
    fn retry_after(&self) -> Option<Duration>;
}

/// Severity levels used when logging failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    /// Degraded but operational
    Warning,
    Error,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        })
    }
}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Backend { is_retryable, .. } => *is_retryable,
            _ => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Timeout { .. } => ErrorSeverity::Warning,
            Self::NotFound { .. } => ErrorSeverity::Info,
            Self::Internal { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Implements `ErrorClassification` for an error enum with one variant
/// wrapping an already-classified error.
///
/// The wrapped variant delegates; every other variant lists its
/// classification explicitly. `ErrorClassification` must be in scope at
/// the call site.
///
/// ```rust,ignore
/// impl_error_classification!(AdapterError, Transport,
///     Self::Rejected { .. } => {
///         retryable: false,
///         severity: ErrorSeverity::Warning,
///         critical: false,
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_error_classification {
    (
        $error_type:ty,
        $inner_variant:ident
        $(,
            $variant:pat => {
                retryable: $retryable:expr,
                severity: $severity:expr,
                critical: $critical:expr
                $(, retry_after: $retry_after:expr)?
                $(,)?
            }
        )*
        $(,)?
    ) => {
        impl $crate::error::ErrorClassification for $error_type {
            fn is_retryable(&self) -> bool {
                match self {
                    Self::$inner_variant(e) => e.is_retryable(),
                    $($variant => $retryable,)*
                }
            }

            fn severity(&self) -> $crate::error::ErrorSeverity {
                match self {
                    Self::$inner_variant(e) => e.severity(),
                    $($variant => $severity,)*
                }
            }

            fn is_critical(&self) -> bool {
                match self {
                    Self::$inner_variant(e) => e.is_critical(),
                    $($variant => $critical,)*
                }
            }

            fn retry_after(&self) -> Option<std::time::Duration> {
                match self {
                    Self::$inner_variant(e) => e.retry_after(),
                    $($($variant => $retry_after,)?)*
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates `CommonError::timeout` behavior for the capability
    /// deadline scenario.
    ///
    /// Assertions:
    /// - Ensures timeouts are retryable warnings.
    #[test]
    fn test_timeout_is_retryable_warning() {
        let err = CommonError::timeout("ner.recognize", Duration::from_millis(250));
        assert!(err.is_retryable());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert!(err.to_string().contains("ner.recognize"));
        assert_eq!(err.error_type_name(), "timeout");
    }

    #[test]
    fn test_backend_retry_flag() {
        assert!(CommonError::backend("advisor", "503", true).is_retryable());
        assert!(!CommonError::backend("advisor", "bad json", false).is_retryable());
    }

    #[test]
    fn test_internal_is_critical() {
        let err = CommonError::internal("span out of range");
        assert!(err.is_critical());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.to_string(), "Internal error: span out of range");
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = CommonError::validation("policy.advisory.top_k", "must be positive");
        assert_eq!(
            err.to_string(),
            "Validation error for field 'policy.advisory.top_k': must be positive"
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
    }
}
