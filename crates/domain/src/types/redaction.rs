use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::action::{Action, DecisionOrigin};
use super::entity::Entity;
use super::pii::PiiType;
use super::token::{PixelRect, Token};

/// A pixel region to paint over, derived from one aligned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionBox {
    #[serde(flatten)]
    pub rect: PixelRect,
    pub page: usize,
    #[serde(rename = "type")]
    pub pii_type: PiiType,
    pub start: usize,
    pub end: usize,
}

impl RedactionBox {
    pub const fn from_token(token: &Token, pii_type: PiiType) -> Self {
        Self { rect: token.rect, page: token.page, pii_type, start: token.start, end: token.end }
    }
}

/// Result of mapping one entity back onto OCR tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "boxes", rename_all = "lowercase")]
pub enum AlignmentOutcome {
    Aligned(Vec<RedactionBox>),
    /// No token matched; the visual layer is left untouched for this entity.
    Unaligned,
}

impl AlignmentOutcome {
    pub const fn is_aligned(&self) -> bool {
        matches!(self, Self::Aligned(_))
    }
}

/// Alignment result for one actionable entity of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityAlignment {
    /// Index into [`RedactionReport::decisions`].
    pub decision_index: usize,
    #[serde(rename = "type")]
    pub pii_type: PiiType,
    pub outcome: AlignmentOutcome,
}

/// Resolved action for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub entity: Entity,
    pub action: Action,
    pub origin: DecisionOrigin,
}

/// A request to the pipeline: analyzed text plus optional OCR tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInput {
    pub text: String,
    #[serde(default)]
    pub tokens: Option<Vec<Token>>,
}

impl DocumentInput {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self { text: text.into(), tokens: None }
    }

    pub fn with_tokens(text: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self { text: text.into(), tokens: Some(tokens) }
    }
}

/// Everything the pipeline produced for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedactionReport {
    pub redacted_text: String,
    /// Merged entities in ascending offset order with their actions.
    pub decisions: Vec<Decision>,
    /// One entry per `Redact`/`Mask` decision when tokens were supplied.
    pub alignments: Vec<EntityAlignment>,
    /// Flattened boxes of every aligned entity, in decision order.
    pub boxes: Vec<RedactionBox>,
    pub unaligned_count: usize,
    pub counts_by_type: BTreeMap<PiiType, usize>,
    /// True when the NER capability was configured but did not answer.
    pub model_degraded: bool,
}
