//! Agent entity and its creation/update payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DraftError;
use super::ids::AgentId;

/// Maximum length accepted for an agent name.
pub const AGENT_NAME_MAX_LEN: usize = 100;

/// Sampling temperature bounds accepted by the backend.
pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 2.0);

/// Reply token budget bounds accepted by the client.
pub const MAX_TOKENS_RANGE: (i32, i32) = (128, 32_000);

/// Default sampling temperature for new agents.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default reply token budget for new agents.
pub const DEFAULT_MAX_TOKENS: i32 = 2_048;

/// A named configuration of model, prompt, and sampling parameters.
///
/// Agents are independent of projects; conversations reference them by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Backend-assigned identifier.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Identifier of the underlying model (free-form routing string).
    pub base_model: String,
    /// Optional system prompt prepended to every conversation.
    pub system_prompt: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens per reply.
    pub max_tokens: i32,
    /// Creation timestamp.
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(with = "super::timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating an agent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentDraft {
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Identifier of the underlying model.
    pub base_model: String,
    /// Optional system prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens per reply.
    pub max_tokens: i32,
}

impl AgentDraft {
    /// Create a draft with default sampling parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, base_model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            base_model: base_model.into(),
            system_prompt: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the reply token budget.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: i32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Check the constraints enforced before submission.
    ///
    /// # Errors
    /// Returns `DraftError` if the name or model is empty, or a sampling
    /// parameter is out of range.
    pub fn validate(&self) -> Result<(), DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::EmptyName);
        }
        if name.len() > AGENT_NAME_MAX_LEN {
            return Err(DraftError::NameTooLong {
                max: AGENT_NAME_MAX_LEN,
                got: name.len(),
            });
        }
        if self.base_model.trim().is_empty() {
            return Err(DraftError::EmptyModel);
        }
        let (temp_min, temp_max) = TEMPERATURE_RANGE;
        if !(temp_min..=temp_max).contains(&self.temperature) {
            return Err(DraftError::TemperatureOutOfRange(self.temperature));
        }
        let (tok_min, tok_max) = MAX_TOKENS_RANGE;
        if !(tok_min..=tok_max).contains(&self.max_tokens) {
            return Err(DraftError::MaxTokensOutOfRange(self.max_tokens));
        }
        Ok(())
    }
}

/// Partial update payload for an agent; absent fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AgentPatch {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New base model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_model: Option<String>,
    /// New system prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// New sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// New reply token budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults_are_valid() {
        let draft = AgentDraft::new("Helper", "ministral-3:8b");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_draft_rejects_out_of_range_sampling() {
        let hot = AgentDraft::new("Helper", "m").with_temperature(2.5);
        assert_eq!(
            hot.validate(),
            Err(DraftError::TemperatureOutOfRange(2.5))
        );

        let tiny = AgentDraft::new("Helper", "m").with_max_tokens(64);
        assert_eq!(tiny.validate(), Err(DraftError::MaxTokensOutOfRange(64)));
    }

    #[test]
    fn test_draft_rejects_blank_identity() {
        assert_eq!(
            AgentDraft::new(" ", "m").validate(),
            Err(DraftError::EmptyName)
        );
        assert_eq!(
            AgentDraft::new("Helper", "  ").validate(),
            Err(DraftError::EmptyModel)
        );
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = AgentPatch {
            temperature: Some(1.0),
            ..AgentPatch::default()
        };
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            "{\"temperature\":1.0}"
        );
    }
}
