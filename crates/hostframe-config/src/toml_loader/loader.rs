//! Read config from a path or the platform default.

use std::io::ErrorKind;
use std::path::Path;

use hostframe_common::ConfigError;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};
use crate::schema::HostframeConfig;
use crate::validation;

/// Load config from a specific TOML file.
///
/// Missing fields take their defaults. A config that fails validation is
/// logged and returned as parsed.
pub fn load_from_path(path: &Path) -> Result<HostframeConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::ParseError(format!("failed to read {}: {e}", path.display())),
    })?;

    let config: HostframeConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), error = %e, "config failed validation, keeping parsed values");
    }

    info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load config from the platform default path.
///
/// On Linux: `~/.config/hostframe/config.toml`
/// On macOS: `~/Library/Application Support/hostframe/config.toml`
///
/// If the file does not exist, writes a commented default and returns
/// defaults.
pub fn load_default() -> Result<HostframeConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "no config found, creating default");
            create_default_config(&path)?;
            Ok(HostframeConfig::default())
        }
        Err(e) => Err(e),
    }
}
