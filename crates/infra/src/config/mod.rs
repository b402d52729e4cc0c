//! Configuration loading
//!
//! Layers a config file and `PIIVEIL_*` environment variables over the
//! built-in defaults.

pub mod loader;

pub use loader::{apply_env_overrides, load, load_from_file, probe_config_paths};
