//! Hostframe configuration.
//!
//! A single TOML file with `[logging]`, `[window]`, `[frame]` and `[app]`
//! sections. Every section has defaults, so a partial file (or none at all)
//! works.
//!
//! ```rust,no_run
//! use hostframe_config::{config_to_json, load_config};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod toml_writer;
pub mod validation;

pub use schema::{AppConfig, FrameConfig, HostframeConfig, LogLevel, LoggingConfig, WindowConfig};
pub use toml_loader::{create_default_config, default_config_path, load_default, load_from_path};
pub use toml_writer::save_config_to_path;
pub use validation::validate;

use hostframe_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Creates a default file if none exists.
pub fn load_config() -> Result<HostframeConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &HostframeConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
