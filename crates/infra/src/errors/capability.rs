//! Failures specific to talking to an external capability endpoint.

use piiveil_common::error::{ErrorClassification, ErrorSeverity};
use piiveil_common::impl_error_classification;
use piiveil_domain::PiiVeilError;
use reqwest::{Response, StatusCode};

/// Error raised by the NER and advisory adapters.
///
/// Messages carry status codes and schema problems only; request and
/// response bodies can contain the very values being protected.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    /// 5xx or 429 left over after the client's own retries
    #[error("{capability} is unavailable (status {status})")]
    Unavailable { capability: &'static str, status: u16 },

    /// Endpoint refused the request itself
    #[error("{capability} rejected the request (status {status})")]
    Rejected { capability: &'static str, status: u16 },

    /// Endpoint rejected the configured credentials
    #[error("{0} rejected the configured credentials")]
    Unauthorized(&'static str),

    /// Response body does not match the expected schema
    #[error("{capability} sent an invalid response: {reason}")]
    InvalidResponse { capability: &'static str, reason: String },

    /// Transport failure already classified by the HTTP client
    #[error(transparent)]
    Transport(#[from] PiiVeilError),
}

impl_error_classification!(CapabilityError, Transport,
    Self::Unavailable { .. } => {
        retryable: true,
        severity: ErrorSeverity::Warning,
        critical: false,
    },
    Self::Rejected { .. } | Self::Unauthorized(_) | Self::InvalidResponse { .. } => {
        retryable: false,
        severity: ErrorSeverity::Warning,
        critical: false,
    }
);

impl From<CapabilityError> for PiiVeilError {
    fn from(err: CapabilityError) -> Self {
        match err {
            CapabilityError::Transport(inner) => inner,
            other if other.is_retryable() => PiiVeilError::Network(other.to_string()),
            other => PiiVeilError::Capability(other.to_string()),
        }
    }
}

/// Pass a successful response through; classify anything else.
pub(crate) fn ensure_success(
    capability: &'static str,
    response: Response,
) -> Result<Response, CapabilityError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let code = status.as_u16();
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CapabilityError::Unauthorized(capability),
        StatusCode::TOO_MANY_REQUESTS => CapabilityError::Unavailable { capability, status: code },
        s if s.is_server_error() => CapabilityError::Unavailable { capability, status: code },
        _ => CapabilityError::Rejected { capability, status: code },
    })
}
