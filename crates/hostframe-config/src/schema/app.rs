//! Startup application.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Registered application launched at startup.
    pub launch: String,
    /// Entry document, relative to the application's content directory.
    pub resource: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            launch: "IframeDemo".into(),
            resource: "/data/index.html".into(),
        }
    }
}
