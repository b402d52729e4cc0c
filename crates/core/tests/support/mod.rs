//! Shared test helpers for `piiveil-core` integration tests.
//!
//! Lightweight mocks for the external capabilities so pipeline tests can
//! focus on behaviour instead of boilerplate.

pub mod capabilities;
