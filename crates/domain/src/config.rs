//! Configuration management

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ADVISORY_CONCURRENCY, DEFAULT_ADVISORY_TIMEOUT_MS, DEFAULT_ADVISORY_TOP_K,
    DEFAULT_CAPABILITY_ATTEMPTS, DEFAULT_FILL_RGB, DEFAULT_MAX_INPUT_BYTES, DEFAULT_NER_TIMEOUT_MS,
};
use crate::errors::{PiiVeilError, Result};
use crate::types::{Action, PiiType, PolicyTable};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionConfig,
    pub policy: PolicyConfig,
    pub visual: VisualConfig,
    pub logging: LoggingConfig,
}

/// Entity extraction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Pattern rules to run. Table order is preserved regardless of the
    /// order listed here.
    pub enabled_types: Vec<PiiType>,
    pub max_input_bytes: usize,
    pub ner: NerConfig,
}

/// External NER capability configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NerConfig {
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
    pub max_attempts: usize,
    /// Spans reporting a lower confidence are dropped.
    pub min_confidence: Option<f32>,
}

/// Policy resolution configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Per-type overrides of the default policy table, keyed by wire name.
    pub rules: BTreeMap<String, Action>,
    /// Action applied when the advisory path fails.
    pub fail_action: Action,
    pub advisory: AdvisoryConfig,
}

/// External policy advisory configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub enabled: bool,
    pub endpoint: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: Option<String>,
    /// Number of policy statements retrieved as context.
    pub top_k: usize,
    /// Upper bound on advisory requests in flight for one document.
    pub max_concurrent: usize,
    pub timeout_ms: u64,
    pub max_attempts: usize,
}

/// Visual redaction configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Refuse output when an actionable entity cannot be aligned to tokens.
    pub require_complete: bool,
    pub fill_rgb: [u8; 3],
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            enabled_types: PiiType::PATTERN_TYPES.to_vec(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            ner: NerConfig::default(),
        }
    }
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            timeout_ms: DEFAULT_NER_TIMEOUT_MS,
            max_attempts: DEFAULT_CAPABILITY_ATTEMPTS,
            min_confidence: None,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self { rules: BTreeMap::new(), fail_action: Action::Keep, advisory: AdvisoryConfig::default() }
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            model: None,
            top_k: DEFAULT_ADVISORY_TOP_K,
            max_concurrent: DEFAULT_ADVISORY_CONCURRENCY,
            timeout_ms: DEFAULT_ADVISORY_TIMEOUT_MS,
            max_attempts: DEFAULT_CAPABILITY_ATTEMPTS,
        }
    }
}

impl fmt::Debug for AdvisoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisoryConfig")
            .field("enabled", &self.enabled)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("top_k", &self.top_k)
            .field("max_concurrent", &self.max_concurrent)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self { require_complete: false, fill_rgb: DEFAULT_FILL_RGB }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

impl NerConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl AdvisoryConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl PolicyConfig {
    /// Default policy table with `rules` applied.
    ///
    /// # Errors
    /// Returns `PiiVeilError::Config` for an unknown type name.
    pub fn table(&self) -> Result<PolicyTable> {
        PolicyTable::with_overrides(&self.rules)
    }
}

impl Config {
    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    /// Returns `PiiVeilError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let detection = &self.detection;
        if detection.max_input_bytes == 0 {
            return Err(config_error("detection.max_input_bytes", "must be positive"));
        }
        if detection.enabled_types.contains(&PiiType::Person) {
            return Err(config_error(
                "detection.enabled_types",
                "PERSON has no pattern rule; enable detection.ner instead",
            ));
        }

        let ner = &detection.ner;
        if ner.enabled {
            if ner.endpoint.as_deref().map_or(true, str::is_empty) {
                return Err(config_error("detection.ner.endpoint", "required when ner is enabled"));
            }
            if ner.timeout_ms == 0 {
                return Err(config_error("detection.ner.timeout_ms", "must be positive"));
            }
        }
        if let Some(min) = ner.min_confidence {
            if !(0.0..=1.0).contains(&min) {
                return Err(config_error("detection.ner.min_confidence", "must be within 0..=1"));
            }
        }

        let advisory = &self.policy.advisory;
        if advisory.enabled {
            if advisory.endpoint.as_deref().map_or(true, str::is_empty) {
                return Err(config_error(
                    "policy.advisory.endpoint",
                    "required when advisory is enabled",
                ));
            }
            if advisory.timeout_ms == 0 {
                return Err(config_error("policy.advisory.timeout_ms", "must be positive"));
            }
        }
        if advisory.top_k == 0 {
            return Err(config_error("policy.advisory.top_k", "must be positive"));
        }
        if advisory.max_concurrent == 0 {
            return Err(config_error("policy.advisory.max_concurrent", "must be positive"));
        }

        self.policy.table()?;
        Ok(())
    }
}

fn config_error(field: &str, message: &str) -> PiiVeilError {
    PiiVeilError::Config(format!("{field}: {message}"))
}
