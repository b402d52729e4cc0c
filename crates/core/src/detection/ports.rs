//! Port interfaces for model-based entity recognition

use async_trait::async_trait;
use piiveil_domain::Result;

/// A labeled span reported by a recognition model.
///
/// Offsets are byte offsets into the text passed to
/// [`EntityRecognizer::recognize`]. Adapters whose backend reports character
/// offsets convert them before returning.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedSpan {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub confidence: Option<f32>,
}

impl RecognizedSpan {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self { start, end, label: label.into(), confidence: None }
    }

    #[must_use]
    pub const fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// True for the labels a model uses for personal names.
    pub fn is_person_label(&self) -> bool {
        ["PERSON", "PER", "NAME"].iter().any(|label| self.label.trim().eq_ignore_ascii_case(label))
    }
}

/// Trait for an external named-entity recognition capability
///
/// Built once and shared; the extractor treats any error as a degraded
/// model and continues with pattern matches only.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Label spans of `text`
    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedSpan>>;
}
