//! Tracing subscriber initialization

use piiveil_domain::{LoggingConfig, PiiVeilError, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set and valid; otherwise `config.level` is used as
/// the filter directive. Output goes to stderr so stdout stays free for
/// command results.
///
/// # Errors
/// Returns `PiiVeilError::Config` when `config.level` is not a valid
/// directive or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|err| {
            PiiVeilError::Config(format!("logging.level `{}`: {}", config.level, err))
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true).with_writer(std::io::stderr)).try_init()
    };

    installed.map_err(|err| PiiVeilError::Config(format!("logging already initialized: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_level_rejected_before_install() {
        std::env::remove_var("RUST_LOG");
        let config = LoggingConfig { level: "info,[[[".into(), json: false };
        assert!(matches!(init_logging(&config), Err(PiiVeilError::Config(_))));
    }
}
