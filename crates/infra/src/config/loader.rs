//! Configuration loader
//!
//! Builds the effective [`Config`] in layers:
//! 1. Built-in defaults
//! 2. A config file, either given explicitly or found by probing
//! 3. `PIIVEIL_*` environment variable overrides
//! 4. [`Config::validate`]
//!
//! A missing probed file is not an error; the defaults stand. An explicit
//! path that does not exist is.
//!
//! ## Environment Variables
//! - `PIIVEIL_LOG_LEVEL`: fallback log filter when `RUST_LOG` is unset
//! - `PIIVEIL_LOG_JSON`: emit JSON log lines (true/false)
//! - `PIIVEIL_MAX_INPUT_BYTES`: upper bound on document text size
//! - `PIIVEIL_NER_ENABLED` / `PIIVEIL_NER_ENDPOINT`: external NER capability
//! - `PIIVEIL_ADVISORY_ENABLED` / `PIIVEIL_ADVISORY_ENDPOINT`: policy advisor
//! - `PIIVEIL_ADVISORY_API_KEY`: bearer token for the advisor
//! - `PIIVEIL_ADVISORY_MODEL`: model name forwarded to the advisor
//! - `PIIVEIL_FAIL_ACTION`: action applied when the advisor fails
//! - `PIIVEIL_REQUIRE_COMPLETE`: refuse partial visual redaction (true/false)
//!
//! ## File Locations
//! Without an explicit path the loader probes, in order, `piiveil.toml`,
//! `piiveil.json`, `config.toml` and `config.json` in the working directory,
//! its two parents, and the directory holding the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use piiveil_domain::{Action, Config, PiiVeilError, Result};

const FILE_NAMES: [&str; 4] = ["piiveil.toml", "piiveil.json", "config.toml", "config.json"];

/// Load the effective configuration.
///
/// # Errors
/// Returns `PiiVeilError::Config` if:
/// - `path` is given but does not exist
/// - the file cannot be read or parsed
/// - an override variable holds an invalid value
/// - the merged configuration fails validation
pub fn load(path: Option<PathBuf>) -> Result<Config> {
    let mut config = match path.or_else(probe_config_paths) {
        Some(path) => load_from_file(&path)?,
        None => {
            tracing::debug!("no config file found, starting from defaults");
            Config::default()
        }
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Read and parse a single config file without env overrides or validation.
///
/// # Errors
/// Returns `PiiVeilError::Config` if the file is missing, unreadable, or not
/// valid JSON/TOML for [`Config`].
pub fn load_from_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(PiiVeilError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "loading configuration file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| PiiVeilError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, path)
}

/// Overlay `PIIVEIL_*` variables onto `config`.
///
/// # Errors
/// Returns `PiiVeilError::Config` for a variable that is set but invalid.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(level) = env_opt("PIIVEIL_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("PIIVEIL_LOG_JSON", config.logging.json);

    if let Some(raw) = env_opt("PIIVEIL_MAX_INPUT_BYTES") {
        config.detection.max_input_bytes = raw
            .parse::<usize>()
            .map_err(|e| PiiVeilError::Config(format!("Invalid PIIVEIL_MAX_INPUT_BYTES: {}", e)))?;
    }

    let ner = &mut config.detection.ner;
    if let Some(endpoint) = env_opt("PIIVEIL_NER_ENDPOINT") {
        ner.endpoint = Some(endpoint);
    }
    ner.enabled = env_bool("PIIVEIL_NER_ENABLED", ner.enabled);

    let advisory = &mut config.policy.advisory;
    if let Some(endpoint) = env_opt("PIIVEIL_ADVISORY_ENDPOINT") {
        advisory.endpoint = Some(endpoint);
    }
    if let Some(key) = env_opt("PIIVEIL_ADVISORY_API_KEY") {
        advisory.api_key = Some(key);
    }
    if let Some(model) = env_opt("PIIVEIL_ADVISORY_MODEL") {
        advisory.model = Some(model);
    }
    advisory.enabled = env_bool("PIIVEIL_ADVISORY_ENABLED", advisory.enabled);

    if let Some(raw) = env_opt("PIIVEIL_FAIL_ACTION") {
        config.policy.fail_action = Action::from_str(&raw).map_err(PiiVeilError::Config)?;
    }

    config.visual.require_complete =
        env_bool("PIIVEIL_REQUIRE_COMPLETE", config.visual.require_complete);

    Ok(())
}

/// Parse configuration content; format is chosen by file extension.
///
/// # Errors
/// Returns `PiiVeilError::Config` if the format is unsupported or parsing
/// fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PiiVeilError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PiiVeilError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(PiiVeilError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// First existing config file in the standard locations, if any.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|candidate| candidate.is_file())
}

/// Set, non-empty environment variable.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
/// Returns `default` when the variable is not set.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
