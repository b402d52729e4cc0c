//! Redaction service - detection, decision and application in one pass

use std::collections::BTreeMap;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use piiveil_domain::constants::{DEFAULT_FILL_RGB, DEFAULT_MAX_INPUT_BYTES};
use piiveil_domain::{
    AlignmentOutcome, Config, Decision, DocumentInput, Entity, EntityAlignment, PiiType,
    PiiVeilError, RedactionReport, Result, Token,
};
use tracing::{info, instrument, warn};

use crate::alignment::{align_entity, TokenLayout};
use crate::detection::{EntityExtractor, EntityRecognizer};
use crate::merge::merge_entities;
use crate::policy::{PolicyAdvisor, PolicyResolver, PolicyRetriever};
use crate::redaction::redact_text;
use crate::visual::{fill_color, redact_pages};

/// Redaction service
///
/// Holds the extractor, the policy resolver and read-only settings. All
/// per-document state lives inside a single call, so one service can be
/// shared across concurrent requests.
pub struct RedactionService {
    extractor: EntityExtractor,
    resolver: PolicyResolver,
    max_input_bytes: usize,
    require_complete: bool,
    fill: Rgba<u8>,
}

impl RedactionService {
    /// Create a service from an extractor and a resolver with default limits
    pub fn new(extractor: EntityExtractor, resolver: PolicyResolver) -> Self {
        Self {
            extractor,
            resolver,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            require_complete: false,
            fill: fill_color(DEFAULT_FILL_RGB),
        }
    }

    /// Create a service from configuration. Capabilities are attached
    /// separately.
    ///
    /// # Errors
    /// Returns `PiiVeilError::Config` when the policy rules are invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let extractor = EntityExtractor::new(&config.detection);
        let resolver = PolicyResolver::from_config(&config.policy)?;

        Ok(Self {
            max_input_bytes: config.detection.max_input_bytes,
            require_complete: config.visual.require_complete,
            fill: fill_color(config.visual.fill_rgb),
            ..Self::new(extractor, resolver)
        })
    }

    /// Attach the NER capability
    pub fn with_recognizer(self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self { extractor: self.extractor.with_recognizer(recognizer), ..self }
    }

    /// Attach the policy advisory capability
    pub fn with_advisor(self, advisor: Arc<dyn PolicyAdvisor>) -> Self {
        Self { resolver: self.resolver.with_advisor(advisor), ..self }
    }

    pub fn with_retriever(self, retriever: Arc<dyn PolicyRetriever>) -> Self {
        Self { resolver: self.resolver.with_retriever(retriever), ..self }
    }

    /// Refuse output when an actionable entity cannot be aligned.
    pub const fn with_require_complete(mut self, require_complete: bool) -> Self {
        self.require_complete = require_complete;
        self
    }

    pub const fn with_max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    pub fn resolver(&self) -> &PolicyResolver {
        &self.resolver
    }

    /// Extract and merge entities without resolving actions.
    ///
    /// # Errors
    /// Returns `PiiVeilError::InvalidInput` when `text` exceeds the size
    /// limit.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn detect(&self, text: &str) -> Result<Vec<Entity>> {
        self.check_size(text)?;
        let extraction = self.extractor.extract(text).await;
        Ok(merge_entities(extraction.candidates))
    }

    /// Run the full pipeline over one document.
    ///
    /// When tokens are supplied they are verified against the text, and each
    /// `Redact`/`Mask` decision is aligned to token boxes.
    ///
    /// # Errors
    /// - `PiiVeilError::InvalidInput` for oversized text or tokens that do
    ///   not describe the text
    /// - `PiiVeilError::IncompleteVisualRedaction` when completeness is
    ///   required and some actionable entity could not be aligned
    #[instrument(skip(self, input), fields(text_len = input.text.len()))]
    pub async fn process(&self, input: DocumentInput) -> Result<RedactionReport> {
        let DocumentInput { text, tokens } = input;
        self.check_size(&text)?;

        let tokens = tokens.filter(|tokens| !tokens.is_empty());
        if let Some(tokens) = &tokens {
            TokenLayout::verify(&text, tokens)?;
        }

        let extraction = self.extractor.extract(&text).await;
        let entities = merge_entities(extraction.candidates);
        let decisions = self.resolver.resolve_all(entities).await;
        let redacted_text = redact_text(&text, &decisions);

        let alignments = tokens.as_deref().map(|t| align_decisions(&decisions, t)).unwrap_or_default();
        let unaligned_count = alignments.iter().filter(|a| !a.outcome.is_aligned()).count();
        if self.require_complete && unaligned_count > 0 {
            warn!(unaligned_count, "Refusing output with incomplete visual redaction");
            return Err(PiiVeilError::IncompleteVisualRedaction(unaligned_count));
        }

        let boxes = alignments
            .iter()
            .filter_map(|alignment| match &alignment.outcome {
                AlignmentOutcome::Aligned(boxes) => Some(boxes.iter().copied()),
                AlignmentOutcome::Unaligned => None,
            })
            .flatten()
            .collect::<Vec<_>>();

        let counts_by_type = count_by_type(&decisions);
        info!(
            entities = decisions.len(),
            boxes = boxes.len(),
            unaligned_count,
            model_degraded = extraction.model_degraded,
            "Document processed"
        );

        Ok(RedactionReport {
            redacted_text,
            decisions,
            alignments,
            boxes,
            unaligned_count,
            counts_by_type,
            model_degraded: extraction.model_degraded,
        })
    }

    /// Paint the report's boxes onto page rasters (a single image is page 0).
    pub fn redact_media(&self, pages: Vec<RgbaImage>, report: &RedactionReport) -> Vec<RgbaImage> {
        redact_pages(pages, &report.boxes, self.fill)
    }

    fn check_size(&self, text: &str) -> Result<()> {
        if text.len() > self.max_input_bytes {
            return Err(PiiVeilError::InvalidInput(format!(
                "text is {} bytes; the limit is {} bytes",
                text.len(),
                self.max_input_bytes
            )));
        }
        Ok(())
    }
}

fn align_decisions(decisions: &[Decision], tokens: &[Token]) -> Vec<EntityAlignment> {
    decisions
        .iter()
        .enumerate()
        .filter(|(_, decision)| decision.action.is_actionable())
        .map(|(decision_index, decision)| EntityAlignment {
            decision_index,
            pii_type: decision.entity.pii_type,
            outcome: align_entity(&decision.entity, tokens),
        })
        .collect()
}

fn count_by_type(decisions: &[Decision]) -> BTreeMap<PiiType, usize> {
    let mut counts = BTreeMap::new();
    for decision in decisions {
        *counts.entry(decision.entity.pii_type).or_insert(0) += 1;
    }
    counts
}
