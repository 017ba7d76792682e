//! Entities exchanged with the NeuroLine backend.
//!
//! Semantic model only; transport concerns live in [`crate::api`] and
//! [`crate::stream`].

pub mod agent;
pub mod ids;
pub mod message;
pub mod project;

pub use agent::{Agent, AgentDraft, AgentPatch};
pub use ids::{AgentId, ConversationId, MessageId, ProjectId};
pub use message::{ChatRequest, Conversation, Message, MessageRole};
pub use project::{
    Project, ProjectDraft, ProjectPatch, ProjectStatus, ProjectStatusMetadata, ProjectType,
    ProjectTypeMetadata,
};

use thiserror::Error;

/// Constraint violations detected on a create payload before submission.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DraftError {
    /// Name is empty after trimming.
    #[error("name must not be empty")]
    EmptyName,
    /// Name exceeds the maximum accepted length.
    #[error("name too long: got {got}, max {max}")]
    NameTooLong {
        /// Maximum allowed length.
        max: usize,
        /// Actual length received.
        got: usize,
    },
    /// Base model is empty after trimming.
    #[error("base model must not be empty")]
    EmptyModel,
    /// Temperature outside the accepted range.
    #[error("temperature {0} outside accepted range [0.0, 2.0]")]
    TemperatureOutOfRange(f32),
    /// Token budget outside the accepted range.
    #[error("max_tokens {0} outside accepted range [128, 32000]")]
    MaxTokensOutOfRange(i32),
}

/// Serde helper for backend timestamps.
///
/// The backend emits naive ISO-8601 timestamps (no offset, implicitly UTC),
/// while RFC 3339 is accepted too. Serialization always uses RFC 3339.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(with_offset.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
