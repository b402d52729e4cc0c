//! Document request files accepted by `piiveil redact`

use std::path::Path;

use anyhow::{Context, Result};
use piiveil_core::TokenLayout;
use piiveil_domain::{DocumentInput, OcrWord};
use serde::Deserialize;

/// Either OCR words per page, from which text and tokens are laid out, or
/// text with tokens that already carry their offsets.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DocumentRequest {
    Pages { pages: Vec<Vec<OcrWord>> },
    Document(DocumentInput),
}

impl DocumentRequest {
    pub fn read(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading document request {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing document request {}", path.display()))
    }

    pub fn into_input(self) -> DocumentInput {
        match self {
            Self::Pages { pages } => TokenLayout::from_pages(pages).into_document(),
            Self::Document(input) => input,
        }
    }
}
