pub mod errors;
pub mod id;

pub use errors::{BridgeError, ConfigError, HostframeError};
pub use id::{new_correlation_id, CorrelationToken, FrameId, Pid};

pub type Result<T> = std::result::Result<T, HostframeError>;
