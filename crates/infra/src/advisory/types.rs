//! Wire types for the policy advisory endpoint

use serde::{Deserialize, Serialize};

/// Request body posted for one entity.
#[derive(Serialize)]
pub(crate) struct AdviseRequest<'a> {
    pub pii_type: &'a str,
    pub pii_value: &'a str,
    pub policy_context: &'a [String],
    pub instruction: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
}

/// Response body. Only `action` is read; anything else is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct AdviseResponse {
    pub action: String,
}
