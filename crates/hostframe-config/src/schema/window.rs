//! Window and frame configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Initial geometry of the application window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Width in logical pixels (valid range: 100-8192).
    pub width: u32,
    /// Height in logical pixels (valid range: 100-8192).
    pub height: u32,
    pub x: i32,
    pub y: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Hostframe".into(),
            width: 400,
            height: 400,
            x: 700,
            y: 200,
        }
    }
}

/// How frame content is served and what it may navigate to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Directory holding one subdirectory per application.
    pub content_root: PathBuf,
    pub devtools: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// URL prefixes frames may navigate to besides bundled content.
    pub extra_origins: Vec<String>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("assets/apps"),
            devtools: false,
            user_agent: None,
            extra_origins: Vec::new(),
        }
    }
}
