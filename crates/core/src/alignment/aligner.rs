//! Mapping entity values back onto OCR word tokens

use piiveil_domain::{AlignmentOutcome, Entity, RedactionBox, Token};

const TRIMMED_PUNCTUATION: &[char] =
    &['.', ',', ';', ':', '(', ')', '[', ']', '{', '}', '<', '>', '"', '\''];

/// Trim whitespace, then surrounding punctuation, then case-fold.
pub fn normalize_token(token: &str) -> String {
    token.trim().trim_matches(TRIMMED_PUNCTUATION).to_lowercase()
}

/// Indices of the tokens that carry `value`.
///
/// The first rule with a non-empty result wins:
/// 1. a multi-word value matches the first contiguous run of equal tokens;
/// 2. otherwise every token equal to the value's first word;
/// 3. otherwise the first token containing that word;
/// 4. otherwise nothing.
pub fn align(value: &str, tokens: &[Token]) -> Vec<usize> {
    let words: Vec<String> =
        value.split_whitespace().map(normalize_token).filter(|w| !w.is_empty()).collect();
    let Some(first) = words.first() else {
        return Vec::new();
    };
    let normalized: Vec<String> = tokens.iter().map(|t| normalize_token(&t.text)).collect();

    if words.len() > 1 {
        if let Some(start) = normalized.windows(words.len()).position(|window| window == words.as_slice())
        {
            return (start..start + words.len()).collect();
        }
    }

    let exact: Vec<usize> = normalized
        .iter()
        .enumerate()
        .filter(|(_, token)| *token == first)
        .map(|(index, _)| index)
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    normalized.iter().position(|token| token.contains(first.as_str())).into_iter().collect()
}

/// Boxes for `entity`, or [`AlignmentOutcome::Unaligned`] when no token
/// matched.
pub fn align_entity(entity: &Entity, tokens: &[Token]) -> AlignmentOutcome {
    let indices = align(&entity.value, tokens);
    if indices.is_empty() {
        return AlignmentOutcome::Unaligned;
    }
    AlignmentOutcome::Aligned(
        indices.into_iter().map(|i| RedactionBox::from_token(&tokens[i], entity.pii_type)).collect(),
    )
}
