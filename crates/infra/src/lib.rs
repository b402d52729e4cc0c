//! # PiiVeil Infrastructure
//!
//! Adapters for the ports defined in `piiveil-core`.
//!
//! This crate contains:
//! - Configuration loading (TOML/JSON files + `PIIVEIL_*` overrides)
//! - A retrying HTTP client for the external capabilities
//! - HTTP adapters for the NER model and the policy advisor
//! - Page raster decoding and PNG encoding
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `piiveil-core`
//! - Contains all I/O; core stays free of HTTP, file system and codecs

pub mod advisory;
pub mod config;
pub mod errors;
pub mod http;
pub mod media;
pub mod ner;
pub mod observability;

pub use advisory::HttpPolicyAdvisor;
pub use errors::{CapabilityError, InfraError};
pub use http::{CapabilityClient, CapabilityClientBuilder};
pub use ner::HttpEntityRecognizer;
pub use observability::init_logging;
