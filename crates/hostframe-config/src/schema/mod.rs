//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work.

mod app;
mod system;
mod window;

pub use app::*;
pub use system::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostframeConfig {
    pub logging: LoggingConfig,
    pub window: WindowConfig,
    pub frame: FrameConfig,
    pub app: AppConfig,
}
