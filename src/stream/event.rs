//! Events carried on the chat stream.

use serde::Deserialize;

use crate::api::ApiError;
use crate::model::ConversationId;

/// One inbound event of a chat turn.
///
/// Every field is optional on the wire; an event usually carries exactly one
/// of them. `conversation_id` arrives at most once per turn, `content`
/// fragments are concatenated verbatim in arrival order, and `done` / `error`
/// terminate the stream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StreamEvent {
    /// Conversation assigned by the backend for a turn started without one.
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
    /// Assistant output fragment to append.
    #[serde(default)]
    pub content: Option<String>,
    /// Completion marker.
    #[serde(default)]
    pub done: bool,
    /// In-band failure description.
    #[serde(default)]
    pub error: Option<String>,
}

impl StreamEvent {
    /// Decode one SSE payload.
    ///
    /// # Errors
    /// Returns [`ApiError::Stream`] if the payload is not a valid event.
    pub fn parse(payload: &str) -> Result<Self, ApiError> {
        serde_json::from_str(payload)
            .map_err(|e| ApiError::Stream(format!("bad event payload {payload:?}: {e}")))
    }

    /// Whether this event ends the turn.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.done || self.error.is_some()
    }

    /// Event carrying a conversation assignment.
    #[must_use]
    pub fn conversation(id: ConversationId) -> Self {
        Self {
            conversation_id: Some(id),
            ..Self::default()
        }
    }

    /// Event carrying a content fragment.
    #[must_use]
    pub fn content(fragment: impl Into<String>) -> Self {
        Self {
            content: Some(fragment.into()),
            ..Self::default()
        }
    }

    /// Completion event.
    #[must_use]
    pub fn done() -> Self {
        Self {
            done: true,
            ..Self::default()
        }
    }

    /// In-band failure event.
    #[must_use]
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            error: Some(description.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_each_shape() {
        assert_eq!(
            StreamEvent::parse("{\"conversation_id\": 42}").unwrap(),
            StreamEvent::conversation(ConversationId::new(42))
        );
        assert_eq!(
            StreamEvent::parse("{\"content\": \"Hi\"}").unwrap(),
            StreamEvent::content("Hi")
        );
        assert_eq!(
            StreamEvent::parse("{\"done\": true}").unwrap(),
            StreamEvent::done()
        );
        assert_eq!(
            StreamEvent::parse("{\"error\": \"model timeout\"}").unwrap(),
            StreamEvent::error("model timeout")
        );
    }

    #[test]
    fn test_parse_rejects_malformed_payload() {
        let err = StreamEvent::parse("{'content': 'Hi'}").unwrap_err();
        assert!(matches!(err, ApiError::Stream(_)));
    }

    #[test]
    fn test_terminal_detection() {
        assert!(StreamEvent::done().is_terminal());
        assert!(StreamEvent::error("x").is_terminal());
        assert!(!StreamEvent::content("x").is_terminal());
    }
}
