//! Named-entity recognition capability over HTTP

mod http_recognizer;

pub use http_recognizer::HttpEntityRecognizer;
