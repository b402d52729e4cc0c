use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use piiveil_core::{AdvisoryRequest, EntityRecognizer, PolicyAdvisor, RecognizedSpan};
use piiveil_domain::{Action, PiiType, PiiVeilError, Result as DomainResult};

/// Recognizer that labels every occurrence of the given names as `PERSON`.
pub struct NameListRecognizer {
    names: Vec<String>,
}

impl NameListRecognizer {
    pub fn new(names: &[&str]) -> Self {
        Self { names: names.iter().map(|n| (*n).to_string()).collect() }
    }
}

#[async_trait]
impl EntityRecognizer for NameListRecognizer {
    async fn recognize(&self, text: &str) -> DomainResult<Vec<RecognizedSpan>> {
        Ok(self
            .names
            .iter()
            .flat_map(|name| {
                text.match_indices(name.as_str())
                    .map(|(start, found)| RecognizedSpan::new(start, start + found.len(), "PERSON"))
                    .collect::<Vec<_>>()
            })
            .collect())
    }
}

/// Recognizer that never answers in time.
pub struct HangingRecognizer;

#[async_trait]
impl EntityRecognizer for HangingRecognizer {
    async fn recognize(&self, _text: &str) -> DomainResult<Vec<RecognizedSpan>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Vec::new())
    }
}

/// Advisor answering per type from a fixed list, erroring for other types.
#[derive(Default)]
pub struct ScriptedAdvisor {
    answers: Vec<(PiiType, Action)>,
    calls: AtomicUsize,
}

impl ScriptedAdvisor {
    pub fn answering(answers: &[(PiiType, Action)]) -> Self {
        Self { answers: answers.to_vec(), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PolicyAdvisor for ScriptedAdvisor {
    async fn advise(&self, request: &AdvisoryRequest) -> DomainResult<Action> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .iter()
            .find(|(pii_type, _)| *pii_type == request.pii_type)
            .map(|(_, action)| *action)
            .ok_or_else(|| PiiVeilError::Policy(format!("no answer for {}", request.pii_type)))
    }
}
