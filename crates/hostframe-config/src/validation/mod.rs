//! Config validation.
//!
//! Every check pushes into one error list, reported as a single
//! `ConfigError::ValidationError`.

mod helpers;


use hostframe_common::ConfigError;

use crate::schema::HostframeConfig;
use helpers::validate_range;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &HostframeConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_window(&mut errors, config);
    validate_frame(&mut errors, config);
    validate_app(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_window(errors: &mut Vec<String>, config: &HostframeConfig) {
    validate_range(errors, "window.width", config.window.width, 100, 8192);
    validate_range(errors, "window.height", config.window.height, 100, 8192);
}

fn validate_frame(errors: &mut Vec<String>, config: &HostframeConfig) {
    for origin in &config.frame.extra_origins {
        if !origin.contains("://") {
            errors.push(format!("frame.extra_origins entry {origin:?} is not a URL prefix"));
        }
    }
}

fn validate_app(errors: &mut Vec<String>, config: &HostframeConfig) {
    if config.app.launch.trim().is_empty() {
        errors.push("app.launch must name an application".into());
    }
    if !config.app.resource.starts_with('/') {
        errors.push(format!(
            "app.resource = {:?} must start with '/'",
            config.app.resource
        ));
    }
}
