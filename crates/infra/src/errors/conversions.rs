//! Conversions from external infrastructure errors into domain errors.

use image::ImageError;
use piiveil_domain::PiiVeilError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PiiVeilError);

impl From<InfraError> for PiiVeilError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PiiVeilError> for InfraError {
    fn from(value: PiiVeilError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoPiiVeilError {
    fn into_piiveil(self) -> PiiVeilError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PiiVeilError */
/* -------------------------------------------------------------------------- */

impl IntoPiiVeilError for HttpError {
    fn into_piiveil(self) -> PiiVeilError {
        if self.is_timeout() {
            return PiiVeilError::Timeout("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return PiiVeilError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => PiiVeilError::Capability(format!("credentials rejected: {message}")),
                404 => PiiVeilError::NotFound(message),
                429 => PiiVeilError::Network(message),
                400..=499 => PiiVeilError::InvalidInput(message),
                _ => PiiVeilError::Network(message),
            };
        }

        if self.is_decode() {
            return PiiVeilError::Capability(format!("malformed response body: {self}"));
        }

        PiiVeilError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_piiveil())
    }
}

/* -------------------------------------------------------------------------- */
/* image::ImageError → PiiVeilError */
/* -------------------------------------------------------------------------- */

impl IntoPiiVeilError for ImageError {
    fn into_piiveil(self) -> PiiVeilError {
        match self {
            ImageError::Decoding(err) => PiiVeilError::InvalidInput(format!("cannot decode image: {err}")),
            ImageError::Unsupported(err) => {
                PiiVeilError::InvalidInput(format!("unsupported image: {err}"))
            }
            ImageError::Limits(err) => PiiVeilError::InvalidInput(format!("image too large: {err}")),
            ImageError::IoError(err) => PiiVeilError::Media(format!("image I/O failed: {err}")),
            other => PiiVeilError::Media(other.to_string()),
        }
    }
}

impl From<ImageError> for InfraError {
    fn from(value: ImageError) -> Self {
        InfraError(value.into_piiveil())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → PiiVeilError */
/* -------------------------------------------------------------------------- */

impl IntoPiiVeilError for std::io::Error {
    fn into_piiveil(self) -> PiiVeilError {
        match self.kind() {
            std::io::ErrorKind::NotFound => PiiVeilError::NotFound(self.to_string()),
            std::io::ErrorKind::InvalidData => PiiVeilError::InvalidInput(self.to_string()),
            _ => PiiVeilError::Media(self.to_string()),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_piiveil())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
