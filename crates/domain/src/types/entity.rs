use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::pii::PiiType;
use crate::errors::{PiiVeilError, Result};

/// Where an entity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntitySource {
    /// The static rule table.
    Pattern,
    /// An external labeling capability.
    Model,
}

/// A located PII finding.
///
/// `start..end` is a half-open UTF-8 byte range into the exact text buffer
/// the extractor ran over, always on `char` boundaries. Entities are created
/// per request and never mutated afterwards.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub pii_type: PiiType,
    pub value: String,
    pub source: EntitySource,
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("pii_type", &self.pii_type)
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

impl Entity {
    /// Build an entity from a span of `text`, materializing its value.
    ///
    /// # Errors
    /// Returns `PiiVeilError::InvalidInput` when the span is reversed, runs
    /// past the end of `text`, or does not fall on `char` boundaries.
    pub fn from_span(
        text: &str,
        start: usize,
        end: usize,
        pii_type: PiiType,
        source: EntitySource,
    ) -> Result<Self> {
        let value = text.get(start..end).filter(|_| start <= end).ok_or_else(|| {
            PiiVeilError::InvalidInput(format!(
                "span {start}..{end} is not a valid range of a {}-byte text",
                text.len()
            ))
        })?;

        Ok(Self { start, end, pii_type, value: value.to_string(), source })
    }

    /// Replace the materialized value, keeping the span.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Byte range of the entity.
    pub const fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length of the span in bytes.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-width span.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when the two spans share at least one byte.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_span_materializes_value() {
        let text = "PAN ABCDE1234F";
        let entity = Entity::from_span(text, 4, 14, PiiType::Pan, EntitySource::Pattern).unwrap();
        assert_eq!(entity.value, "ABCDE1234F");
        assert_eq!(entity.len(), 10);
    }

    #[test]
    fn from_span_rejects_out_of_range_and_reversed() {
        let text = "short";
        assert!(Entity::from_span(text, 2, 9, PiiType::Person, EntitySource::Model).is_err());
        assert!(Entity::from_span(text, 4, 2, PiiType::Person, EntitySource::Model).is_err());
    }

    #[test]
    fn from_span_rejects_split_code_point() {
        let text = "नाम Ravi";
        // Byte 1 is inside the first Devanagari character.
        assert!(Entity::from_span(text, 1, 6, PiiType::Person, EntitySource::Model).is_err());
    }

    #[test]
    fn debug_output_hides_value() {
        let entity =
            Entity::from_span("john@gmail.com", 0, 14, PiiType::Email, EntitySource::Pattern)
                .unwrap();
        let rendered = format!("{entity:?}");
        assert!(!rendered.contains("john"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn overlap_is_half_open() {
        let text = "0123456789";
        let a = Entity::from_span(text, 0, 5, PiiType::Account, EntitySource::Pattern).unwrap();
        let b = Entity::from_span(text, 5, 9, PiiType::Account, EntitySource::Pattern).unwrap();
        let c = Entity::from_span(text, 4, 6, PiiType::Account, EntitySource::Pattern).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn serializes_type_field_name() {
        let entity =
            Entity::from_span("K1234567", 0, 8, PiiType::Passport, EntitySource::Pattern).unwrap();
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "PASSPORT");
        assert_eq!(json["source"], "pattern");
    }
}
