//! In-memory lexical policy index

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use piiveil_domain::{PiiType, Result};

use super::ports::PolicyRetriever;

/// The built-in policy corpus, one statement per category.
pub const DEFAULT_POLICY_CORPUS: [(PiiType, &str); 13] = [
    (PiiType::Aadhaar, "Aadhaar numbers must be fully redacted."),
    (PiiType::Pan, "PAN card numbers should be masked, keeping the last characters visible."),
    (PiiType::DrivingLicence, "Driving licence numbers should be masked."),
    (PiiType::VoterId, "Voter ID numbers should be masked."),
    (PiiType::Passport, "Passport numbers should be masked."),
    (PiiType::Phone, "Phone numbers should be masked, keeping the last 4 digits."),
    (PiiType::Email, "Email addresses should be masked, keeping the domain visible."),
    (PiiType::Ifsc, "IFSC bank branch codes should be masked."),
    (PiiType::Account, "Bank account numbers should be masked, keeping the last 4 digits."),
    (PiiType::Dob, "Dates of birth should be masked."),
    (PiiType::IpAddress, "IP addresses should be masked."),
    (PiiType::Address, "Postal addresses must be redacted."),
    (PiiType::Person, "Person names should be kept unless another rule applies."),
];

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["policy", "for", "with", "value", "be", "should", "must", "the", "a", "an", "of", "and"]
        .into_iter()
        .collect()
});

type TermVector = HashMap<String, f64>;

fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .filter(|word| !STOPWORDS.contains(word.as_str()))
}

fn vectorize<'a>(parts: impl IntoIterator<Item = &'a str>) -> TermVector {
    let mut vector = TermVector::new();
    for term in parts.into_iter().flat_map(terms) {
        *vector.entry(term).or_insert(0.0) += 1.0;
    }
    vector
}

fn norm(vector: &TermVector) -> f64 {
    vector.values().map(|count| count * count).sum::<f64>().sqrt()
}

fn cosine(query: &TermVector, query_norm: f64, doc: &TermVector, doc_norm: f64) -> f64 {
    if query_norm == 0.0 || doc_norm == 0.0 {
        return 0.0;
    }
    let dot: f64 = query
        .iter()
        .filter_map(|(term, weight)| doc.get(term).map(|other| weight * other))
        .sum();
    dot / (query_norm * doc_norm)
}

struct IndexedStatement {
    text: String,
    vector: TermVector,
    norm: f64,
}

/// Cosine similarity over word-frequency vectors of a fixed corpus.
///
/// Each statement is indexed together with the wire name of its category,
/// so a query naming `IP_ADDRESS` finds the IP statement even when the
/// wording differs.
pub struct LexicalPolicyIndex {
    statements: Vec<IndexedStatement>,
}

impl Default for LexicalPolicyIndex {
    fn default() -> Self {
        Self::new(DEFAULT_POLICY_CORPUS.iter().map(|(pii_type, text)| (*pii_type, text.to_string())))
    }
}

impl LexicalPolicyIndex {
    pub fn new(corpus: impl IntoIterator<Item = (PiiType, String)>) -> Self {
        let statements = corpus
            .into_iter()
            .map(|(pii_type, text)| {
                let vector = vectorize([pii_type.as_str(), text.as_str()]);
                let norm = norm(&vector);
                IndexedStatement { text, vector, norm }
            })
            .collect();

        Self { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Up to `top_k` statements by descending similarity; ties keep corpus
    /// order.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<String> {
        let query_vector = vectorize([query]);
        let query_norm = norm(&query_vector);

        let mut scored: Vec<(f64, &IndexedStatement)> = self
            .statements
            .iter()
            .map(|s| (cosine(&query_vector, query_norm, &s.vector, s.norm), s))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        scored.into_iter().take(top_k).map(|(_, s)| s.text.clone()).collect()
    }
}

#[async_trait]
impl PolicyRetriever for LexicalPolicyIndex {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<String>> {
        Ok(self.search(query, top_k))
    }
}

/// Retrieval query for one entity.
pub fn policy_query(pii_type: PiiType, value: &str) -> String {
    format!("Policy for {pii_type} with value {value}")
}
