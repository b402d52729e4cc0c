//! Span-safe rewriting of the analyzed text

use piiveil_domain::constants::REDACTION_BLOCK;
use piiveil_domain::{Action, Decision, Entity};
use tracing::debug;

use super::mask::mask_value;

/// Replacement for one span, or `None` for [`Action::Keep`].
///
/// Masks are computed from `original`, the span's text in the buffer being
/// rewritten, not from the entity's normalized value.
pub fn replacement(entity: &Entity, action: Action, original: &str) -> Option<String> {
    match action {
        Action::Redact => Some(REDACTION_BLOCK.to_string()),
        Action::Mask => Some(mask_value(original, entity.pii_type)),
        Action::Keep => None,
    }
}

/// Apply `(entity, action)` pairs to `text`.
///
/// Replacements run in descending start order so earlier offsets stay valid.
/// Spans that are out of range, off `char` boundaries, or overlap a span
/// already replaced are skipped.
pub fn apply<'a, I>(text: &str, decisions: I) -> String
where
    I: IntoIterator<Item = (&'a Entity, Action)>,
{
    let mut ordered: Vec<(&Entity, Action)> =
        decisions.into_iter().filter(|(_, action)| action.is_actionable()).collect();
    ordered.sort_by(|a, b| b.0.start.cmp(&a.0.start).then(b.0.end.cmp(&a.0.end)));

    let mut output = text.to_string();
    let mut floor = text.len();
    let mut skipped = 0usize;

    for (entity, action) in ordered {
        let span = entity.start..entity.end;
        let Some(original) = text.get(span.clone()).filter(|_| span.end <= floor) else {
            skipped += 1;
            continue;
        };
        if let Some(replacement) = replacement(entity, action, original) {
            output.replace_range(span.clone(), &replacement);
            floor = span.start;
        }
    }

    if skipped > 0 {
        debug!(skipped, "Skipped unusable redaction spans");
    }
    output
}

/// Rewrite `text` according to resolved decisions.
pub fn redact_text(text: &str, decisions: &[Decision]) -> String {
    apply(text, decisions.iter().map(|d| (&d.entity, d.action)))
}
