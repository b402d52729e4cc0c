//! HTTP adapter for the named-entity recognition capability
//!
//! The endpoint receives `{"text": ...}` and answers with
//! `{"entities": [{"start", "end", "label", "confidence"?}]}`, where offsets
//! count characters. They are converted to byte offsets here so the
//! extractor can slice the text directly.

use std::time::Duration;

use async_trait::async_trait;
use piiveil_core::{EntityRecognizer, RecognizedSpan};
use piiveil_domain::{NerConfig, PiiVeilError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::capability::ensure_success;
use crate::errors::CapabilityError;
use crate::http::CapabilityClient;

const CAPABILITY: &str = "ner model";

#[derive(Serialize)]
struct RecognizeRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    entities: Vec<ModelSpan>,
}

#[derive(Debug, Deserialize)]
struct ModelSpan {
    start: usize,
    end: usize,
    label: String,
    #[serde(default)]
    confidence: Option<f32>,
}

pub struct HttpEntityRecognizer {
    client: CapabilityClient,
    endpoint: String,
}

impl HttpEntityRecognizer {
    pub fn new(endpoint: impl Into<String>, client: CapabilityClient) -> Self {
        Self { client, endpoint: endpoint.into() }
    }

    /// Build from configuration, or `None` when the model is disabled,
    /// has no endpoint, or the client cannot be built.
    pub fn from_config(config: &NerConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let endpoint = config.endpoint.as_deref().filter(|e| !e.is_empty())?;

        CapabilityClient::builder()
            .timeout(config.timeout())
            .max_attempts(config.max_attempts)
            .base_backoff(Duration::from_millis(100))
            .build()
            .map(|client| Self::new(endpoint, client))
            .map_err(|err| warn!(error_kind = err.label(), "ner model unavailable"))
            .ok()
    }

    async fn call(&self, text: &str) -> std::result::Result<Vec<ModelSpan>, CapabilityError> {
        let response = self.client.post_json(&self.endpoint, &RecognizeRequest { text }).await?;
        let response = ensure_success(CAPABILITY, response)?;

        let parsed: RecognizeResponse = response.json().await.map_err(|err| {
            CapabilityError::InvalidResponse { capability: CAPABILITY, reason: err.to_string() }
        })?;
        Ok(parsed.entities)
    }
}

#[async_trait]
impl EntityRecognizer for HttpEntityRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedSpan>> {
        let spans = self.call(text).await.map_err(PiiVeilError::from)?;
        let reported = spans.len();

        let converted: Vec<RecognizedSpan> =
            spans.into_iter().filter_map(|span| to_byte_span(text, span)).collect();

        debug!(reported, kept = converted.len(), "ner model answered");
        Ok(converted)
    }
}

/// Byte offset of the `char_index`-th character, allowing one past the end.
fn byte_offset(text: &str, char_index: usize) -> Option<usize> {
    text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).nth(char_index)
}

fn to_byte_span(text: &str, span: ModelSpan) -> Option<RecognizedSpan> {
    if span.start >= span.end {
        return None;
    }
    let start = byte_offset(text, span.start)?;
    let end = byte_offset(text, span.end)?;

    let recognized = RecognizedSpan::new(start, end, span.label);
    Some(match span.confidence {
        Some(confidence) => recognized.with_confidence(confidence),
        None => recognized,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn recognizer_for(server: &MockServer) -> HttpEntityRecognizer {
        let client = CapabilityClient::builder().max_attempts(1).build().expect("client");
        HttpEntityRecognizer::new(server.uri(), client)
    }

    #[test]
    fn char_offsets_become_byte_offsets() {
        let text = "Né à Pune, Ravi Kumar";
        let span = ModelSpan { start: 11, end: 21, label: "PERSON".into(), confidence: None };

        let converted = to_byte_span(text, span).unwrap();
        assert_eq!(&text[converted.start..converted.end], "Ravi Kumar");
    }

    #[test]
    fn out_of_range_and_empty_spans_dropped() {
        let text = "short";
        let beyond = ModelSpan { start: 2, end: 9, label: "PER".into(), confidence: None };
        let empty = ModelSpan { start: 3, end: 3, label: "PER".into(), confidence: None };
        assert!(to_byte_span(text, beyond).is_none());
        assert!(to_byte_span(text, empty).is_none());

        let whole = ModelSpan { start: 0, end: 5, label: "PER".into(), confidence: None };
        assert_eq!(to_byte_span(text, whole).map(|s| s.end), Some(5));
    }

    #[tokio::test]
    async fn posts_text_and_returns_spans() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({ "text": "Name: Asha Rao" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entities": [
                    { "start": 6, "end": 14, "label": "PERSON", "confidence": 0.93 },
                    { "start": 0, "end": 4, "label": "MISC" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let spans = recognizer_for(&server).recognize("Name: Asha Rao").await.unwrap();

        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].end), (6, 14));
        assert!(spans[0].confidence.is_some_and(|c| (c - 0.93).abs() < 1e-6));
        assert!(spans[0].is_person_label());
        assert!(!spans[1].is_person_label());
    }

    #[tokio::test]
    async fn malformed_body_is_capability_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = recognizer_for(&server).recognize("anything").await.unwrap_err();
        assert!(matches!(err, PiiVeilError::Capability(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn server_failure_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = recognizer_for(&server).recognize("anything").await.unwrap_err();
        assert!(matches!(err, PiiVeilError::Network(_)), "got {err:?}");
    }

    #[test]
    fn from_config_requires_enabled_endpoint() {
        let mut config = NerConfig::default();
        config.endpoint = Some("http://localhost:9/ner".into());
        assert!(HttpEntityRecognizer::from_config(&config).is_none());

        config.enabled = true;
        assert!(HttpEntityRecognizer::from_config(&config).is_some());
    }
}
