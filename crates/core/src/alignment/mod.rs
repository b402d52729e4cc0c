//! Alignment of entities to OCR tokens

pub mod aligner;
pub mod layout;

pub use aligner::{align, align_entity, normalize_token};
pub use layout::TokenLayout;
