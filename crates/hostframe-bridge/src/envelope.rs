//! The `{ method, args }` wire unit exchanged across the bridge.
//!
//! Messages flow in both directions:
//! - **Frame -> host**: the frame posts a JSON object, which arrives at
//!   [`crate::Channel::receive`] as a raw string and is parsed here.
//! - **Host -> frame**: the host builds an [`Envelope`] and hands it to
//!   [`crate::Channel::send`], which posts it to the frame content.

use hostframe_common::BridgeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A method-tagged message with an ordered list of opaque arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    method: String,
    args: Vec<Value>,
}

impl Envelope {
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    /// An envelope with no arguments.
    pub fn bare(method: impl Into<String>) -> Self {
        Self::new(method, Vec::new())
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.method, self.args)
    }

    /// Parse an envelope from a raw JSON string (as posted by the frame).
    pub fn from_json(raw: &str) -> Result<Self, BridgeError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| BridgeError::MalformedEnvelope(format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Validate and convert an already-decoded JSON value.
    ///
    /// `method` must be a non-empty string and `args` an array, possibly
    /// empty. Extra top-level fields are ignored.
    pub fn from_value(value: Value) -> Result<Self, BridgeError> {
        let Value::Object(mut map) = value else {
            return Err(BridgeError::MalformedEnvelope(
                "envelope is not an object".into(),
            ));
        };

        let method = match map.remove("method") {
            Some(Value::String(m)) if !m.is_empty() => m,
            Some(Value::String(_)) => {
                return Err(BridgeError::MalformedEnvelope("empty method".into()))
            }
            Some(_) => {
                return Err(BridgeError::MalformedEnvelope(
                    "method is not a string".into(),
                ))
            }
            None => return Err(BridgeError::MalformedEnvelope("missing method".into())),
        };

        let args = match map.remove("args") {
            Some(Value::Array(args)) => args,
            None | Some(Value::Null) => {
                return Err(BridgeError::MalformedEnvelope("missing args".into()))
            }
            Some(_) => {
                return Err(BridgeError::MalformedEnvelope(
                    "args is not an array".into(),
                ))
            }
        };

        Ok(Self { method, args })
    }

    /// The envelope as a JSON object.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "method": self.method,
            "args": self.args,
        })
    }

    /// The envelope serialized as a JSON string.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}
