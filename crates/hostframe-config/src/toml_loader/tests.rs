//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::{HostframeConfig, LogLevel};
use hostframe_common::ConfigError;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let err = load_from_path(Path::new("/tmp/nonexistent_hostframe_config.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[window]
title = "Demo"
width = 640

[app]
launch = "Notes"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.title, "Demo");
    assert_eq!(config.window.width, 640);
    assert_eq!(config.app.launch, "Notes");
    // Defaults preserved
    assert_eq!(config.window.height, 400);
    assert_eq!(config.app.resource, "/data/index.html");
    assert_eq!(config.logging.level, LogLevel::Info);
}

#[test]
fn load_frame_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[frame]
content_root = "/srv/apps"
devtools = true
user_agent = "Test/1.0"
extra_origins = ["https://example.com/"]
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.frame.content_root, Path::new("/srv/apps"));
    assert!(config.frame.devtools);
    assert_eq!(config.frame.user_agent.as_deref(), Some("Test/1.0"));
    assert_eq!(config.frame.extra_origins, vec!["https://example.com/"]);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn invalid_values_are_kept_as_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[window]\nwidth = 10\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.width, 10);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hostframe").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config, HostframeConfig::default());
}

#[test]
fn default_config_path_ends_with_hostframe() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("hostframe/config.toml"));
    }
}
