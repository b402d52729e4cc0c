//! Entity-to-action resolution

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use piiveil_common::resilience::with_deadline;
use piiveil_domain::constants::ADVISORY_INSTRUCTION;
use piiveil_domain::{
    Action, Decision, DecisionOrigin, Entity, PiiVeilError, PolicyConfig, PolicyTable, Result,
};
use tracing::{debug, instrument, warn};

use super::ports::{AdvisoryRequest, PolicyAdvisor, PolicyRetriever};
use super::retriever::{policy_query, LexicalPolicyIndex};

/// An action together with the path that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub action: Action,
    pub origin: DecisionOrigin,
}

impl Resolution {
    const fn new(action: Action, origin: DecisionOrigin) -> Self {
        Self { action, origin }
    }
}

/// Policy resolver
///
/// Looks entities up in the [`PolicyTable`]. When advisory is enabled, each
/// entity is instead sent to the attached advisor together with retrieved
/// policy context; any advisory failure, including a missing advisor,
/// resolves to the configured fail action for that entity only.
pub struct PolicyResolver {
    table: PolicyTable,
    fail_action: Action,
    advisory_enabled: bool,
    advisor: Option<Arc<dyn PolicyAdvisor>>,
    retriever: Arc<dyn PolicyRetriever>,
    top_k: usize,
    advisory_timeout: Duration,
    advisory_concurrency: usize,
}

impl PolicyResolver {
    /// Table-only resolver.
    pub fn new(table: PolicyTable) -> Self {
        let defaults = PolicyConfig::default();
        Self {
            table,
            fail_action: defaults.fail_action,
            advisory_enabled: false,
            advisor: None,
            retriever: Arc::new(LexicalPolicyIndex::default()),
            top_k: defaults.advisory.top_k,
            advisory_timeout: defaults.advisory.timeout(),
            advisory_concurrency: defaults.advisory.max_concurrent,
        }
    }

    /// Resolver configured from `config`; attach an advisor with
    /// [`with_advisor`](Self::with_advisor) to activate the advisory path.
    ///
    /// # Errors
    /// Returns `PiiVeilError::Config` for an unknown type in `policy.rules`.
    pub fn from_config(config: &PolicyConfig) -> Result<Self> {
        let mut resolver = Self::new(config.table()?);
        resolver.fail_action = config.fail_action;
        resolver.advisory_enabled = config.advisory.enabled;
        resolver.top_k = config.advisory.top_k;
        resolver.advisory_timeout = config.advisory.timeout();
        resolver.advisory_concurrency = config.advisory.max_concurrent.max(1);
        Ok(resolver)
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn PolicyAdvisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    /// Replace the built-in lexical index.
    pub fn with_retriever(mut self, retriever: Arc<dyn PolicyRetriever>) -> Self {
        self.retriever = retriever;
        self
    }

    pub const fn with_fail_action(mut self, action: Action) -> Self {
        self.fail_action = action;
        self
    }

    pub const fn fail_action(&self) -> Action {
        self.fail_action
    }

    pub fn table(&self) -> &PolicyTable {
        &self.table
    }

    /// True when entities go to the advisory path instead of the table.
    pub const fn uses_advisory(&self) -> bool {
        self.advisory_enabled
    }

    /// Table lookup only.
    pub fn resolve_default(&self, entity: &Entity) -> Resolution {
        Resolution::new(self.table.lookup(entity.pii_type), DecisionOrigin::Table)
    }

    /// Resolve one entity.
    #[instrument(skip(self, entity), fields(pii_type = %entity.pii_type))]
    pub async fn resolve(&self, entity: &Entity) -> Resolution {
        if !self.advisory_enabled {
            return self.resolve_default(entity);
        }
        let Some(advisor) = self.advisor.as_ref() else {
            warn!(
                event = "advisory_fallback",
                pii_type = %entity.pii_type,
                error_kind = "capability",
                fail_action = %self.fail_action,
                "Advisory enabled without an advisor; applying fail action"
            );
            return Resolution::new(self.fail_action, DecisionOrigin::Fallback);
        };

        let advice = with_deadline(
            "policy.advise",
            self.advisory_timeout,
            self.consult(advisor.as_ref(), entity),
        )
        .await;

        match advice {
            Ok(action) => {
                debug!(action = %action, "Advisory decision accepted");
                Resolution::new(action, DecisionOrigin::Advisory)
            }
            Err(err) => {
                warn!(
                    event = "advisory_fallback",
                    pii_type = %entity.pii_type,
                    error_kind = err.label(),
                    fail_action = %self.fail_action,
                    "Advisory unavailable; applying fail action"
                );
                Resolution::new(self.fail_action, DecisionOrigin::Fallback)
            }
        }
    }

    /// Resolve every entity, preserving order. At most
    /// `policy.advisory.max_concurrent` advisory calls are in flight.
    pub async fn resolve_all(&self, entities: Vec<Entity>) -> Vec<Decision> {
        let resolutions: Vec<Resolution> = stream::iter(entities.iter())
            .map(|entity| self.resolve(entity))
            .buffered(self.advisory_concurrency)
            .collect()
            .await;

        entities
            .into_iter()
            .zip(resolutions)
            .map(|(entity, resolution)| Decision {
                entity,
                action: resolution.action,
                origin: resolution.origin,
            })
            .collect()
    }

    async fn consult(
        &self,
        advisor: &dyn PolicyAdvisor,
        entity: &Entity,
    ) -> std::result::Result<Action, PiiVeilError> {
        let query = policy_query(entity.pii_type, &entity.value);
        let context = self.retriever.retrieve(&query, self.top_k).await?;

        let request = AdvisoryRequest {
            pii_type: entity.pii_type,
            value: entity.value.clone(),
            context,
            instruction: ADVISORY_INSTRUCTION.to_string(),
        };
        advisor.advise(&request).await
    }
}

impl Default for PolicyResolver {
    fn default() -> Self {
        Self::new(PolicyTable::default())
    }
}
