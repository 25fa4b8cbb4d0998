use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures surfaced by the frame bridge.
///
/// None of these are fatal to the host: every variant describes an operation
/// that was refused or a message that was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("frame is not ready")]
    NotReady,

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("process destroyed")]
    ProcessDestroyed,

    #[error("origin mismatch: expected {expected}, got {actual}")]
    OriginMismatch { expected: String, actual: String },

    #[error("channel closed")]
    ChannelClosed,

    #[error("frame error: {0}")]
    Frame(String),

    #[error("unknown application: {0}")]
    UnknownApplication(String),

    #[error("application already registered: {0}")]
    DuplicateApplication(String),
}

#[derive(Debug, thiserror::Error)]
pub enum HostframeError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
