//! Reconstruction of analyzed text from OCR words, and the consistency check
//! that alignment depends on

use piiveil_domain::constants::{PAGE_SEPARATOR, WORD_SEPARATOR};
use piiveil_domain::{DocumentInput, OcrWord, PiiVeilError, Result, Token};

/// Analyzed text plus the tokens positioned inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenLayout {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl TokenLayout {
    /// Lay out OCR words page by page.
    ///
    /// Words with non-blank text are joined by a single space within a page;
    /// pages are joined by a blank line. Empty pages still contribute their
    /// separator, so page boundaries stay stable across documents.
    pub fn from_pages(pages: Vec<Vec<OcrWord>>) -> Self {
        let mut text = String::new();
        let mut tokens = Vec::new();

        for (page, words) in pages.into_iter().enumerate() {
            if page > 0 {
                text.push_str(PAGE_SEPARATOR);
            }
            let mut first_on_page = true;
            for word in words.into_iter().filter(|w| !w.text.trim().is_empty()) {
                if !first_on_page {
                    text.push_str(WORD_SEPARATOR);
                }
                first_on_page = false;

                let start = text.len();
                text.push_str(&word.text);
                tokens.push(Token { text: word.text, rect: word.rect, page, start, end: text.len() });
            }
        }

        Self { text, tokens }
    }

    /// Layout for a single image.
    pub fn from_words(words: Vec<OcrWord>) -> Self {
        Self::from_pages(vec![words])
    }

    /// Check that `tokens` describe `text`.
    ///
    /// Every span must be in range, on `char` boundaries and equal to the
    /// token's text; spans must be ordered and disjoint; only whitespace may
    /// sit between consecutive tokens. Text before the first token or after
    /// the last one is not constrained.
    ///
    /// # Errors
    /// Returns `PiiVeilError::InvalidInput` naming the first offending token.
    pub fn verify(text: &str, tokens: &[Token]) -> Result<()> {
        let mut previous_end: Option<usize> = None;

        for (index, token) in tokens.iter().enumerate() {
            let Some(slice) = text.get(token.start..token.end).filter(|_| token.start <= token.end)
            else {
                return Err(layout_error(index, "span is not a valid range of the text"));
            };
            if slice != token.text {
                return Err(layout_error(index, "text does not match its span"));
            }
            if let Some(previous_end) = previous_end {
                if token.start < previous_end {
                    return Err(layout_error(index, "overlaps or precedes the previous token"));
                }
                if !text[previous_end..token.start].chars().all(char::is_whitespace) {
                    return Err(layout_error(index, "non-whitespace text between tokens"));
                }
            }
            previous_end = Some(token.end);
        }

        Ok(())
    }

    pub fn into_document(self) -> DocumentInput {
        DocumentInput::with_tokens(self.text, self.tokens)
    }
}

fn layout_error(index: usize, reason: &str) -> PiiVeilError {
    PiiVeilError::InvalidInput(format!("token {index}: {reason}"))
}
