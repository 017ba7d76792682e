//! Messages, conversations, and the chat-turn request.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AgentId, ConversationId, MessageId, ProjectId};

/// Author of a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// User input.
    User,
    /// Assistant reply.
    Assistant,
}

impl MessageRole {
    /// Stable string form, matching the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(value.to_string()),
        }
    }
}

/// One entry in a conversation's append-only history.
///
/// Once appended to the visible history a message is immutable. The
/// in-progress streaming text is a separate transient buffer owned by the
/// session store, not a `Message`, until the stream completes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Backend-assigned id, or a negative client-local placeholder.
    pub id: MessageId,
    /// Owning conversation; `None` only for an optimistic local echo sent
    /// before the backend has assigned a conversation id.
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
    /// Author of the message.
    pub role: MessageRole,
    /// Text content.
    pub content: String,
    /// Creation timestamp.
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build a user message stamped with the current time.
    #[must_use]
    pub fn user(
        id: MessageId,
        conversation_id: Option<ConversationId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            conversation_id,
            role: MessageRole::User,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Build an assistant message stamped with the current time.
    #[must_use]
    pub fn assistant(
        id: MessageId,
        conversation_id: Option<ConversationId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            conversation_id,
            role: MessageRole::Assistant,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// An ordered thread of messages tied to one agent within one project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Backend-assigned identifier.
    pub id: ConversationId,
    /// Agent this conversation is bound to.
    pub agent_id: AgentId,
    /// Creation timestamp.
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    /// Messages in conversation order.
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Parameters of one chat turn sent to the streaming endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User message text.
    pub message: String,
    /// Active project.
    pub project_id: ProjectId,
    /// Active agent.
    pub agent_id: AgentId,
    /// Existing conversation to continue; the backend creates one when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,
}

impl ChatRequest {
    /// Query parameters for the streaming endpoint.
    #[must_use]
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("message", self.message.clone()),
            ("project_id", self.project_id.to_string()),
            ("agent_id", self.agent_id.to_string()),
        ];
        if let Some(id) = self.conversation_id {
            params.push(("conversation_id", id.to_string()));
        }
        params
    }
}
