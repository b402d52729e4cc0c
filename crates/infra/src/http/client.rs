use std::time::Duration;

use piiveil_common::ErrorClassification;
use piiveil_domain::PiiVeilError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use serde::Serialize;
use tracing::debug;

use crate::errors::InfraError;

const USER_AGENT: &str = concat!("piiveil/", env!("CARGO_PKG_VERSION"));

/// HTTP client used to reach the NER and advisory endpoints.
///
/// Server errors and retryable transport failures (timeouts, refused
/// connections) are retried with exponential backoff; client errors are
/// returned to the caller on the first attempt.
#[derive(Clone)]
pub struct CapabilityClient {
    client: ReqwestClient,
    bearer: Option<String>,
    max_attempts: usize,
    base_backoff: Duration,
}

impl CapabilityClient {
    pub fn builder() -> CapabilityClientBuilder {
        CapabilityClientBuilder::default()
    }

    /// Client with default timeout and retry settings.
    pub fn new() -> Result<Self, PiiVeilError> {
        Self::builder().build()
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Request builder carrying the configured bearer token, if any.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        let builder = self.client.request(method, url);
        match &self.bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// POST `body` as JSON and return the response, whatever its status.
    pub async fn post_json<B>(&self, url: &str, body: &B) -> Result<Response, PiiVeilError>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, url).json(body)).await
    }

    /// Execute `builder`, retrying transient failures.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, PiiVeilError> {
        let attempts = self.max_attempts.max(1);

        for attempt in 1..=attempts {
            let request = builder
                .try_clone()
                .ok_or_else(|| {
                    PiiVeilError::Internal("streaming request bodies cannot be retried".into())
                })?
                .build()
                .map_err(|err| PiiVeilError::from(InfraError::from(err)))?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt, %method, %url, "sending capability request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "capability responded");

                    if status.is_server_error() && attempt < attempts {
                        self.pause(attempt).await;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    let err = PiiVeilError::from(InfraError::from(err));
                    debug!(attempt, %method, %url, error_kind = err.label(), "capability request failed");

                    if attempt < attempts && err.is_retryable() {
                        self.pause(attempt).await;
                        continue;
                    }
                    return Err(err);
                }
            }
        }

        Err(PiiVeilError::Internal("capability client ran out of attempts".into()))
    }

    fn backoff(&self, retry: usize) -> Duration {
        let shift = retry.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    async fn pause(&self, retry: usize) {
        let delay = self.backoff(retry);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`CapabilityClient`].
#[derive(Debug)]
pub struct CapabilityClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    bearer: Option<String>,
    user_agent: String,
    default_headers: HeaderMap,
}

impl Default for CapabilityClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            bearer: None,
            user_agent: USER_AGENT.to_string(),
            default_headers: HeaderMap::new(),
        }
    }
}

impl CapabilityClientBuilder {
    /// Per-attempt transport timeout. The caller's overall deadline is
    /// enforced separately.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token.filter(|t| !t.is_empty());
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn header(mut self, name: &'static str, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    pub fn build(self) -> Result<CapabilityClient, PiiVeilError> {
        if self.default_headers.contains_key(AUTHORIZATION) {
            return Err(PiiVeilError::Config(
                "set credentials with bearer(), not a raw Authorization header".into(),
            ));
        }

        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .default_headers(self.default_headers)
            .no_proxy()
            .build()
            .map_err(|err| PiiVeilError::from(InfraError::from(err)))?;

        Ok(CapabilityClient {
            client,
            bearer: self.bearer,
            max_attempts: self.max_attempts,
            base_backoff: self.base_backoff,
        })
    }
}
