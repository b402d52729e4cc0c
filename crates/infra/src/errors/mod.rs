//! Infrastructure error types and their conversion into `PiiVeilError`.

pub mod capability;
pub mod conversions;

pub use capability::CapabilityError;
pub use conversions::InfraError;
