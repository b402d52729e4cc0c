//! Port interfaces for advisory policy resolution

use std::fmt;

use async_trait::async_trait;
use piiveil_domain::{Action, PiiType, Result};

/// Everything the advisory capability is told about one entity.
#[derive(Clone, PartialEq, Eq)]
pub struct AdvisoryRequest {
    pub pii_type: PiiType,
    pub value: String,
    /// Policy statements retrieved for this entity, best match first.
    pub context: Vec<String>,
    pub instruction: String,
}

impl fmt::Debug for AdvisoryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisoryRequest")
            .field("pii_type", &self.pii_type)
            .field("value", &"[REDACTED]")
            .field("context", &self.context)
            .field("instruction", &self.instruction)
            .finish()
    }
}

/// Trait for an external capability that decides an entity's action
#[async_trait]
pub trait PolicyAdvisor: Send + Sync {
    /// Decide the action for one entity.
    ///
    /// Implementations return an error for anything that is not one of the
    /// three actions; the resolver turns every error into the fail action.
    async fn advise(&self, request: &AdvisoryRequest) -> Result<Action>;
}

/// Trait for similarity search over policy statements
#[async_trait]
pub trait PolicyRetriever: Send + Sync {
    /// Up to `top_k` statements most similar to `query`, best first.
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<String>>;
}
