//! Resilience helpers for calls into external capabilities
//!
//! The pipeline treats the NER model and the policy advisor as optional
//! collaborators: every call is bounded by a deadline and a miss turns into a
//! classified [`CommonError`](crate::error::CommonError) that callers degrade
//! on instead of propagating.

pub mod timeout;

pub use timeout::{with_deadline, with_timeout};
