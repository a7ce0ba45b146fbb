//! Cross-frame message protocol
//!
//! Every payload is a JSON object whose `message` field names the kind.
//! Field names follow the wire format (`appPath`), not Rust naming.

mod origin;

pub use origin::OriginPolicy;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Discriminator values understood by either side of the channel
const KNOWN_KINDS: &[&str] = &["routed", "set-height", "notification", "broadcast", "sub-route"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "message", rename_all = "kebab-case")]
pub enum Message {
    /// Guest → shell: the guest navigated internally.
    #[serde(rename_all = "camelCase")]
    Routed { app_path: String, route: String },

    /// Guest → shell: rendered content height in pixels.
    #[serde(rename_all = "camelCase")]
    SetHeight {
        app_path: String,
        #[serde(deserialize_with = "lenient_number")]
        height: f64,
    },

    /// Either direction: a tagged notification for the receiver's handler.
    Notification {
        tag: String,
        #[serde(default)]
        data: Value,
    },

    /// Guest → shell: notify the shell and every sibling guest.
    #[serde(rename_all = "camelCase")]
    Broadcast {
        tag: String,
        #[serde(default)]
        data: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        app_path: Option<String>,
    },

    /// Shell → guest: navigate to a sub-route.
    SubRoute {
        route: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
}

impl Message {
    /// Decode a raw payload. Unknown kinds and malformed known kinds yield
    /// `None`; cross-frame traffic is not ours to validate.
    pub fn decode(payload: &Value) -> Option<Message> {
        let kind = payload.get("message")?.as_str()?;
        if !KNOWN_KINDS.contains(&kind) {
            return None;
        }
        match Message::deserialize(payload) {
            Ok(message) => Some(message),
            Err(e) => {
                warn!(kind, error = %e, "Dropping malformed message");
                None
            }
        }
    }

    pub fn to_value(&self) -> Value {
        // Infallible: no map keys other than strings.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Message::Routed { .. } => "routed",
            Message::SetHeight { .. } => "set-height",
            Message::Notification { .. } => "notification",
            Message::Broadcast { .. } => "broadcast",
            Message::SubRoute { .. } => "sub-route",
        }
    }
}

/// An inbound delivery: payload plus the sender's origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub origin: String,
    pub payload: Value,
}

impl Envelope {
    pub fn new(origin: impl Into<String>, payload: Value) -> Self {
        Self {
            origin: origin.into(),
            payload,
        }
    }

    pub fn from_message(origin: impl Into<String>, message: &Message) -> Self {
        Self::new(origin, message.to_value())
    }

    /// Payloads that carry nothing are skipped before any policy check.
    pub fn is_empty(&self) -> bool {
        match &self.payload {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Bool(b) => !b,
            _ => false,
        }
    }
}

/// Heights arrive as numbers or numeric strings.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
