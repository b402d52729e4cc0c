//! End-to-end redaction pipeline

pub mod service;

pub use service::RedactionService;
