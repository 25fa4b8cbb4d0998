use hostframe_common::{BridgeError, CorrelationToken};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Method name of the envelope that answers a `create-dialog` request.
pub const DIALOG_RESPONSE: &str = "dialog-response";

/// Dialog kind used when the frame does not name one.
const DEFAULT_KIND: &str = "alert";

/// What the frame asked the host to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogRequest {
    /// Dialog kind (`alert`, `confirm`, `prompt`, ...).
    pub kind: String,
    /// Options passed through to the dialog service, minus the token.
    pub options: Value,
    /// Correlation token supplied by the frame, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<CorrelationToken>,
}

impl DialogRequest {
    pub fn new(kind: impl Into<String>, options: Value) -> Self {
        Self {
            kind: kind.into(),
            options,
            token: None,
        }
    }

    /// Parse `create-dialog` arguments: `[options]` or `[kind, options]`.
    ///
    /// A string `token` field inside the options is lifted out as the
    /// request's correlation token.
    pub fn from_args(args: &[Value]) -> Result<Self, BridgeError> {
        let (kind, options) = match args {
            [Value::String(kind), rest @ ..] => {
                let options = rest.first().cloned().unwrap_or_else(|| Value::Object(Default::default()));
                (kind.clone(), options)
            }
            [options @ Value::Object(_), ..] => (DEFAULT_KIND.to_string(), options.clone()),
            [] => {
                return Err(BridgeError::MalformedEnvelope(
                    "create-dialog without arguments".into(),
                ))
            }
            [other, ..] => {
                return Err(BridgeError::MalformedEnvelope(format!(
                    "create-dialog options must be an object, got {other}"
                )))
            }
        };

        let Value::Object(mut options) = options else {
            return Err(BridgeError::MalformedEnvelope(
                "create-dialog options must be an object".into(),
            ));
        };

        let token = match options.remove("token") {
            Some(Value::String(t)) if !t.is_empty() => Some(CorrelationToken::from(t)),
            Some(other) => {
                // Not ours to interpret; hand it back to the dialog untouched.
                options.insert("token".into(), other);
                None
            }
            None => None,
        };

        Ok(Self {
            kind,
            options: Value::Object(options),
            token,
        })
    }

    /// Human-readable message from the options, if present.
    pub fn message(&self) -> Option<&str> {
        self.options.get("message").and_then(Value::as_str)
    }

    /// Window title from the options, if present.
    pub fn title(&self) -> Option<&str> {
        self.options.get("title").and_then(Value::as_str)
    }
}

/// The user's answer: the button pressed and an optional value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogChoice {
    pub button: String,
    pub value: Value,
}

impl DialogChoice {
    pub fn new(button: impl Into<String>, value: Value) -> Self {
        Self {
            button: button.into(),
            value,
        }
    }

    /// A choice that carries no value.
    pub fn button(button: impl Into<String>) -> Self {
        Self::new(button, Value::Null)
    }

    /// Response payload: `{ btn, value, token }`.
    pub(crate) fn into_payload(self, token: &CorrelationToken) -> Value {
        serde_json::json!({
            "btn": self.button,
            "value": self.value,
            "token": token,
        })
    }
}
