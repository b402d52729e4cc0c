//! Multi-source entity extraction

use std::sync::Arc;
use std::time::Duration;

use piiveil_common::resilience::with_deadline;
use piiveil_domain::{DetectionConfig, Entity, EntitySource, PiiType, PiiVeilError};
use tracing::{debug, instrument, warn};

use super::ports::{EntityRecognizer, RecognizedSpan};
use super::rules::{PatternRule, RULES};

/// Candidates produced by one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Pattern candidates in rule-table order, then model candidates.
    /// May overlap; see [`crate::merge::merge_entities`].
    pub candidates: Vec<Entity>,
    /// True when a configured model failed or timed out.
    pub model_degraded: bool,
}

/// Entity extractor over the static rule table plus an optional model.
pub struct EntityExtractor {
    rules: Vec<&'static PatternRule>,
    recognizer: Option<Arc<dyn EntityRecognizer>>,
    ner_timeout: Duration,
    min_confidence: Option<f32>,
}

impl EntityExtractor {
    /// Build an extractor running the rules enabled in `config`.
    pub fn new(config: &DetectionConfig) -> Self {
        let rules = RULES.iter().filter(|rule| config.enabled_types.contains(&rule.pii_type)).collect();

        Self {
            rules,
            recognizer: None,
            ner_timeout: config.ner.timeout(),
            min_confidence: config.ner.min_confidence,
        }
    }

    /// Attach a recognition model for person names
    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn has_recognizer(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Types of the active pattern rules, in table order.
    pub fn enabled_types(&self) -> Vec<PiiType> {
        self.rules.iter().map(|rule| rule.pii_type).collect()
    }

    /// Run every enabled pattern rule over `text`.
    ///
    /// Candidates failing their type's validator are dropped silently.
    pub fn extract_patterns(&self, text: &str) -> Vec<Entity> {
        let mut candidates = Vec::new();

        for rule in &self.rules {
            for found in rule.find(text) {
                let raw = &text[found.start..found.end];
                if !rule.accepts(raw) {
                    continue;
                }
                candidates.push(Entity {
                    start: found.start,
                    end: found.end,
                    pii_type: rule.pii_type,
                    value: found.normalized.unwrap_or_else(|| raw.to_string()),
                    source: EntitySource::Pattern,
                });
            }
        }

        candidates
    }

    /// Extract all candidates from `text`.
    ///
    /// Model failures never fail extraction; they set
    /// [`Extraction::model_degraded`] and log a warning.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn extract(&self, text: &str) -> Extraction {
        let mut candidates = self.extract_patterns(text);
        let pattern_count = candidates.len();
        let mut model_degraded = false;

        if let Some(recognizer) = &self.recognizer {
            match self.recognize(recognizer.as_ref(), text).await {
                Ok(entities) => candidates.extend(entities),
                Err(err) => {
                    model_degraded = true;
                    warn!(
                        event = "ner_degraded",
                        error_kind = err.label(),
                        "Entity recognition unavailable; continuing with pattern matches"
                    );
                }
            }
        }

        debug!(pattern_count, model_count = candidates.len() - pattern_count, "Extraction complete");
        Extraction { candidates, model_degraded }
    }

    async fn recognize(
        &self,
        recognizer: &dyn EntityRecognizer,
        text: &str,
    ) -> Result<Vec<Entity>, PiiVeilError> {
        let spans = with_deadline("ner.recognize", self.ner_timeout, recognizer.recognize(text)).await?;
        let total = spans.len();

        let entities: Vec<Entity> = spans
            .into_iter()
            .filter(|span| self.accepts_span(span))
            .filter_map(|span| {
                Entity::from_span(text, span.start, span.end, PiiType::Person, EntitySource::Model)
                    .ok()
                    .filter(|entity| !entity.is_empty())
            })
            .collect();

        if entities.len() < total {
            debug!(dropped = total - entities.len(), "Ignored model spans");
        }
        Ok(entities)
    }

    fn accepts_span(&self, span: &RecognizedSpan) -> bool {
        if !span.is_person_label() {
            return false;
        }
        match (self.min_confidence, span.confidence) {
            (Some(min), Some(confidence)) => confidence >= min,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use piiveil_domain::Result;

    use super::*;

    struct FixedRecognizer(Vec<RecognizedSpan>);

    #[async_trait]
    impl EntityRecognizer for FixedRecognizer {
        async fn recognize(&self, _text: &str) -> Result<Vec<RecognizedSpan>> {
            Ok(self.0.clone())
        }
    }

    struct FailingRecognizer;

    #[async_trait]
    impl EntityRecognizer for FailingRecognizer {
        async fn recognize(&self, _text: &str) -> Result<Vec<RecognizedSpan>> {
            Err(PiiVeilError::Capability("model unavailable".into()))
        }
    }

    fn extractor() -> EntityExtractor {
        EntityExtractor::new(&DetectionConfig::default())
    }

    fn found(text: &str) -> Vec<(PiiType, String)> {
        extractor().extract_patterns(text).into_iter().map(|e| (e.pii_type, e.value)).collect()
    }

    #[test]
    fn pattern_candidates_follow_table_order() {
        let candidates = found("Mail john@gmail.com from 192.168.1.10 on 12/10/1995");
        let types: Vec<PiiType> = candidates.iter().map(|(t, _)| *t).collect();
        assert_eq!(types, vec![PiiType::Email, PiiType::Dob, PiiType::IpAddress]);
    }

    #[test]
    fn invalid_aadhaar_is_dropped_silently() {
        let candidates = found("Aadhaar 1234 5678 9012");
        assert!(candidates.iter().all(|(t, _)| *t != PiiType::Aadhaar));

        let candidates = found("Aadhaar 2345 6789 0123");
        assert!(candidates.contains(&(PiiType::Aadhaar, "2345 6789 0123".to_string())));
    }

    #[test]
    fn passport_survives_while_pan_lookalike_is_rejected() {
        let candidates = found("Passport K1234567");
        assert!(candidates.contains(&(PiiType::Passport, "K1234567".to_string())));
        assert!(candidates.iter().all(|(t, _)| *t != PiiType::Pan));
    }

    #[test]
    fn address_value_is_normalized_but_span_is_raw() {
        let text = "Address: 12, MG Road,\nChennai";
        let entities = extractor().extract_patterns(text);
        let address = entities.iter().find(|e| e.pii_type == PiiType::Address).unwrap();
        assert_eq!(address.value, "12, MG Road, Chennai");
        assert_eq!(&text[address.span()], "12, MG Road,\nChennai");
    }

    #[test]
    fn disabled_types_are_skipped() {
        let config = DetectionConfig { enabled_types: vec![PiiType::Email], ..Default::default() };
        let extractor = EntityExtractor::new(&config);
        let entities = extractor.extract_patterns("john@gmail.com 192.168.1.10");
        assert_eq!(entities.len(), 1);
        assert_eq!(extractor.enabled_types(), vec![PiiType::Email]);
    }

    #[tokio::test]
    async fn model_spans_follow_patterns_and_only_person_labels_count() {
        let text = "Ravi Kumar wrote to john@gmail.com";
        let recognizer = FixedRecognizer(vec![
            RecognizedSpan::new(0, 10, "per"),
            RecognizedSpan::new(20, 34, "ORG"),
            RecognizedSpan::new(30, 99, "PERSON"),
        ]);
        let extraction = extractor().with_recognizer(Arc::new(recognizer)).extract(text).await;

        assert!(!extraction.model_degraded);
        assert_eq!(extraction.candidates.len(), 2);
        assert_eq!(extraction.candidates[0].pii_type, PiiType::Email);
        let person = &extraction.candidates[1];
        assert_eq!((person.pii_type, person.source), (PiiType::Person, EntitySource::Model));
        assert_eq!(person.value, "Ravi Kumar");
    }

    #[tokio::test]
    async fn low_confidence_spans_are_filtered() {
        let mut config = DetectionConfig::default();
        config.ner.min_confidence = Some(0.8);
        let recognizer = FixedRecognizer(vec![
            RecognizedSpan::new(0, 4, "PERSON").with_confidence(0.5),
            RecognizedSpan::new(5, 10, "PERSON").with_confidence(0.9),
        ]);
        let extraction = EntityExtractor::new(&config)
            .with_recognizer(Arc::new(recognizer))
            .extract("Ravi Kumar")
            .await;

        assert_eq!(extraction.candidates.len(), 1);
        assert_eq!(extraction.candidates[0].value, "Kumar");
    }

    #[tokio::test]
    async fn failing_model_degrades_to_patterns() {
        let extraction = extractor()
            .with_recognizer(Arc::new(FailingRecognizer))
            .extract("Write to john@gmail.com")
            .await;

        assert!(extraction.model_degraded);
        assert_eq!(extraction.candidates.len(), 1);
        assert_eq!(extraction.candidates[0].pii_type, PiiType::Email);
    }
}
