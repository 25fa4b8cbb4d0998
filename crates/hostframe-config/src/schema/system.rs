//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Log level for the `hostframe` crates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// `EnvFilter` directive scoping this level to hostframe crates.
    pub fn directive(self) -> String {
        format!("hostframe={}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parses_lowercase() {
        let cfg: LoggingConfig = toml::from_str("level = \"debug\"").unwrap();
        assert_eq!(cfg.level, LogLevel::Debug);
        assert!(toml::from_str::<LoggingConfig>("level = \"DEBUG\"").is_err());
    }

    #[test]
    fn directive_targets_hostframe() {
        assert_eq!(LogLevel::default().directive(), "hostframe=info");
        assert_eq!(LogLevel::Warn.directive(), "hostframe=warn");
    }
}
