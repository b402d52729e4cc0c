//! # PiiVeil Core
//!
//! Pure pipeline logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Structural validators and the static pattern rule table
//! - Entity extraction, overlap merging and policy resolution
//! - Span-safe text redaction, token alignment and box painting
//! - Port interfaces (traits) for the NER and advisory capabilities
//!
//! ## Architecture Principles
//! - Depends only on `piiveil-common` and `piiveil-domain`
//! - No HTTP, file system or codec code
//! - External capabilities via traits, held as `Arc<dyn Trait>`

pub mod alignment;
pub mod detection;
pub mod merge;
pub mod pipeline;
pub mod policy;
pub mod redaction;
pub mod visual;

// Re-export specific items to avoid ambiguity
pub use alignment::{align, align_entity, TokenLayout};
pub use detection::{EntityExtractor, EntityRecognizer, Extraction, RecognizedSpan};
pub use merge::merge_entities;
pub use pipeline::RedactionService;
pub use policy::{
    AdvisoryRequest, LexicalPolicyIndex, PolicyAdvisor, PolicyResolver, PolicyRetriever,
    Resolution,
};
pub use redaction::{apply, mask_value, redact_text};
pub use visual::{paint_boxes, redact_pages};
