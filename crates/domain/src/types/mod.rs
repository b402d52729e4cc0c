//! Domain types and models
//!
//! Entities, tokens and boxes are request-scoped values: created fresh per
//! document, never persisted, and only ever filtered after creation.

pub mod action;
pub mod entity;
pub mod pii;
pub mod policy;
pub mod redaction;
pub mod token;

pub use action::{Action, DecisionOrigin};
pub use entity::{Entity, EntitySource};
pub use pii::PiiType;
pub use policy::PolicyTable;
pub use redaction::{
    AlignmentOutcome, Decision, DocumentInput, EntityAlignment, RedactionBox, RedactionReport,
};
pub use token::{OcrWord, PixelRect, Token};
