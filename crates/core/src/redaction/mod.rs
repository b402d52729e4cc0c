//! Text redaction

pub mod mask;
pub mod text;

pub use mask::mask_value;
pub use text::{apply, redact_text, replacement};
