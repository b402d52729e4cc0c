//! Shared HTTP transport for the external capability adapters.

pub mod client;

pub use client::{CapabilityClient, CapabilityClientBuilder};
