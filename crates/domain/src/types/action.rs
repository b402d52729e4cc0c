use serde::{Deserialize, Serialize};

use crate::impl_wire_name_conversions;

/// What to do with a located entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Replace the span with an opaque block marker.
    #[serde(alias = "REDACT", alias = "Redact")]
    Redact,
    /// Replace the span with a partially revealing mask.
    #[serde(alias = "MASK", alias = "Mask")]
    Mask,
    /// Leave the span untouched.
    #[default]
    #[serde(alias = "KEEP", alias = "Keep")]
    Keep,
}

impl_wire_name_conversions!(Action {
    Redact => "REDACT",
    Mask => "MASK",
    Keep => "KEEP",
});

impl Action {
    /// True when the action alters the document.
    pub const fn is_actionable(self) -> bool {
        !matches!(self, Self::Keep)
    }
}

/// Which path produced an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionOrigin {
    /// Policy table lookup.
    Table,
    /// Accepted answer from the advisory capability.
    Advisory,
    /// Advisory failed; the configured fail action was applied.
    Fallback,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_is_the_default_and_not_actionable() {
        assert_eq!(Action::default(), Action::Keep);
        assert!(!Action::Keep.is_actionable());
        assert!(Action::Mask.is_actionable());
    }

    #[test]
    fn deserializes_either_case() {
        let lower: Action = serde_json::from_str("\"redact\"").unwrap();
        let upper: Action = serde_json::from_str("\"MASK\"").unwrap();
        assert_eq!(lower, Action::Redact);
        assert_eq!(upper, Action::Mask);
        assert!(serde_json::from_str::<Action>("\"DELETE\"").is_err());
    }
}
