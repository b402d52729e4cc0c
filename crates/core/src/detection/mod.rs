//! Candidate detection: validators, the rule table and the extractor

pub mod extractor;
pub mod ports;
pub mod rules;
pub mod validators;

pub use extractor::{EntityExtractor, Extraction};
pub use ports::{EntityRecognizer, RecognizedSpan};
pub use rules::{PatternRule, RULES};
