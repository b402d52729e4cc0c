//! # PiiVeil Domain
//!
//! Domain types and models for PiiVeil.
//!
//! This crate contains:
//! - PII categories, entities, OCR tokens and redaction boxes
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - Depends only on the foundation tier of `piiveil-common`
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
