//! HTTP adapter for the policy advisory capability

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use piiveil_core::{AdvisoryRequest, PolicyAdvisor};
use piiveil_domain::{Action, AdvisoryConfig, PiiVeilError, Result};
use tracing::{debug, warn};

use super::types::{AdviseRequest, AdviseResponse};
use crate::errors::capability::ensure_success;
use crate::errors::CapabilityError;
use crate::http::CapabilityClient;

const CAPABILITY: &str = "policy advisor";

/// Asks a remote service which action to apply to an entity.
pub struct HttpPolicyAdvisor {
    client: CapabilityClient,
    endpoint: String,
    model: Option<String>,
}

impl HttpPolicyAdvisor {
    pub fn new(endpoint: impl Into<String>, client: CapabilityClient) -> Self {
        Self { client, endpoint: endpoint.into(), model: None }
    }

    /// Model name forwarded with every request.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Build from configuration.
    ///
    /// Returns `None` when advisory is disabled or no endpoint is set, or
    /// when the HTTP client cannot be built. With advisory enabled and no
    /// advisor attached, the resolver applies the configured fail action.
    pub fn from_config(config: &AdvisoryConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let endpoint = config.endpoint.as_deref().filter(|e| !e.is_empty())?;

        let client = CapabilityClient::builder()
            .timeout(config.timeout())
            .max_attempts(config.max_attempts)
            .base_backoff(Duration::from_millis(100))
            .bearer(config.api_key.clone())
            .build();

        match client {
            Ok(client) => {
                let advisor = Self::new(endpoint, client);
                Some(match &config.model {
                    Some(model) => advisor.with_model(model),
                    None => advisor,
                })
            }
            Err(err) => {
                warn!(error_kind = err.label(), "policy advisor unavailable");
                None
            }
        }
    }

    async fn call(&self, request: &AdvisoryRequest) -> std::result::Result<Action, CapabilityError> {
        let body = AdviseRequest {
            pii_type: request.pii_type.as_str(),
            pii_value: &request.value,
            policy_context: &request.context,
            instruction: &request.instruction,
            model: self.model.as_deref(),
        };

        let response = self.client.post_json(&self.endpoint, &body).await?;
        let response = ensure_success(CAPABILITY, response)?;

        let parsed: AdviseResponse = response.json().await.map_err(|err| {
            CapabilityError::InvalidResponse { capability: CAPABILITY, reason: err.to_string() }
        })?;

        Action::from_str(&parsed.action).map_err(|_| CapabilityError::InvalidResponse {
            capability: CAPABILITY,
            reason: "action is not one of REDACT, MASK, KEEP".into(),
        })
    }
}

#[async_trait]
impl PolicyAdvisor for HttpPolicyAdvisor {
    async fn advise(&self, request: &AdvisoryRequest) -> Result<Action> {
        let action = self.call(request).await.map_err(PiiVeilError::from)?;
        debug!(pii_type = %request.pii_type, %action, "advisor answered");
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use piiveil_domain::constants::ADVISORY_INSTRUCTION;
    use piiveil_domain::PiiType;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn request() -> AdvisoryRequest {
        AdvisoryRequest {
            pii_type: PiiType::Pan,
            value: "ABCDE1234F".into(),
            context: vec!["PAN numbers must be masked.".into()],
            instruction: ADVISORY_INSTRUCTION.into(),
        }
    }

    async fn advisor_for(server: &MockServer) -> HttpPolicyAdvisor {
        let client = CapabilityClient::builder()
            .max_attempts(1)
            .bearer(Some("sk-test".into()))
            .build()
            .expect("client");
        HttpPolicyAdvisor::new(format!("{}/advise", server.uri()), client).with_model("policy-small")
    }

    #[tokio::test]
    async fn parses_action_case_insensitively() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/advise"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "pii_type": "PAN",
                "pii_value": "ABCDE1234F",
                "policy_context": ["PAN numbers must be masked."],
                "model": "policy-small"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "action": " mask " })))
            .expect(1)
            .mount(&server)
            .await;

        let action = advisor_for(&server).await.advise(&request()).await.unwrap();
        assert_eq!(action, Action::Mask);
    }

    #[tokio::test]
    async fn unknown_action_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "action": "SHRED" })))
            .mount(&server)
            .await;

        let err = advisor_for(&server).await.advise(&request()).await.unwrap_err();
        assert!(matches!(err, PiiVeilError::Capability(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn missing_action_field_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "decision": "KEEP" })))
            .mount(&server)
            .await;

        assert!(advisor_for(&server).await.advise(&request()).await.is_err());
    }

    #[tokio::test]
    async fn rejected_credentials_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        match advisor_for(&server).await.advise(&request()).await {
            Err(PiiVeilError::Capability(msg)) => assert!(msg.contains("credentials")),
            other => panic!("expected capability error, got {other:?}"),
        }
    }

    #[test]
    fn disabled_config_builds_nothing() {
        let mut config = AdvisoryConfig::default();
        assert!(HttpPolicyAdvisor::from_config(&config).is_none());

        config.enabled = true;
        assert!(HttpPolicyAdvisor::from_config(&config).is_none());

        config.endpoint = Some("http://localhost:9/advise".into());
        assert!(HttpPolicyAdvisor::from_config(&config).is_some());
    }
}
