use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Booking;

// ── Inbound ──

/// Payload posted by the dialogue platform. Both sections are kept as raw
/// JSON: a handler name that is not a string dispatches as an unknown intent
/// and params that are not an object read as empty.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub handler: Option<Value>,
    #[serde(default)]
    pub session: Option<Value>,
}

impl WebhookRequest {
    pub fn handler_name(&self) -> Option<&str> {
        self.handler
            .as_ref()
            .and_then(|h| h.get("name"))
            .and_then(Value::as_str)
    }

    pub fn params(&self) -> Option<&Map<String, Value>> {
        self.session
            .as_ref()
            .and_then(|s| s.get("params"))
            .and_then(Value::as_object)
    }
}

// ── Outbound ──

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Prompt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionPayload {
    pub params: Booking,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prompt {
    #[serde(rename = "override")]
    pub override_: PromptOverride,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptOverride {
    pub messages: Vec<PromptMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptMessage {
    pub text: String,
}

impl Prompt {
    fn text(text: impl Into<String>) -> Self {
        Prompt {
            override_: PromptOverride {
                messages: vec![PromptMessage { text: text.into() }],
            },
        }
    }
}

impl WebhookResponse {
    /// Message-only reply.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            session: None,
            prompt: Some(Prompt::text(text)),
        }
    }

    /// Hands the booking back to the dialogue layer as session parameters.
    pub fn booking(booking: Booking) -> Self {
        Self {
            session: Some(SessionPayload { params: booking }),
            prompt: None,
        }
    }

    pub fn booking_with_message(booking: Booking, text: impl Into<String>) -> Self {
        Self {
            session: Some(SessionPayload { params: booking }),
            prompt: Some(Prompt::text(text)),
        }
    }

    #[cfg(test)]
    pub fn message_text(&self) -> Option<&str> {
        self.prompt
            .as_ref()
            .and_then(|p| p.override_.messages.first())
            .map(|m| m.text.as_str())
    }
}
