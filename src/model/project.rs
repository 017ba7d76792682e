//! Project entity, tag enums, and their display metadata.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DraftError;
use super::ids::ProjectId;

/// Maximum length accepted for a project name.
pub const PROJECT_NAME_MAX_LEN: usize = 100;

/// Kind of work a project is scoped to.
///
/// Display labels, descriptions, and icons for each value are served by the
/// backend metadata endpoints and never drive client logic.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    /// Full-stack web application.
    WebApp,
    /// REST or GraphQL API service.
    Api,
    /// Data science, analytics, or ML work.
    DataAnalysis,
    /// Technical documentation or content writing.
    Documentation,
    /// Database schema, queries, and optimization.
    Database,
    /// Anything else.
    #[default]
    General,
}

impl ProjectType {
    /// Stable string form, matching the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WebApp => "web_app",
            Self::Api => "api",
            Self::DataAnalysis => "data_analysis",
            Self::Documentation => "documentation",
            Self::Database => "database",
            Self::General => "general",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "web_app" => Ok(Self::WebApp),
            "api" => Ok(Self::Api),
            "data_analysis" => Ok(Self::DataAnalysis),
            "documentation" => Ok(Self::Documentation),
            "database" => Ok(Self::Database),
            "general" => Ok(Self::General),
            _ => Err(value.to_string()),
        }
    }
}

/// Lifecycle status of a project.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Currently being worked on.
    #[default]
    Active,
    /// Temporarily on hold.
    Paused,
    /// Finished.
    Completed,
    /// Kept for reference only.
    Archived,
}

impl ProjectStatus {
    /// Stable string form, matching the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            _ => Err(value.to_string()),
        }
    }
}

/// A workspace scoping a set of conversations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Backend-assigned identifier.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Kind of work this project is scoped to.
    pub project_type: ProjectType,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Creation timestamp.
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(with = "super::timestamp")]
    pub updated_at: DateTime<Utc>,
    /// Last time the project was opened.
    #[serde(with = "super::timestamp")]
    pub last_accessed: DateTime<Utc>,
}

/// Payload for creating a project.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectDraft {
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Kind of work this project is scoped to.
    pub project_type: ProjectType,
    /// Lifecycle status.
    pub status: ProjectStatus,
}

impl ProjectDraft {
    /// Create a draft with default type and status.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            project_type: ProjectType::default(),
            status: ProjectStatus::default(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the project type.
    #[must_use]
    pub const fn with_project_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = project_type;
        self
    }

    /// Set the status.
    #[must_use]
    pub const fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Check the constraints the backend enforces on project names.
    ///
    /// # Errors
    /// Returns `DraftError` if the name is empty after trimming or too long.
    pub fn validate(&self) -> Result<(), DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::EmptyName);
        }
        if name.len() > PROJECT_NAME_MAX_LEN {
            return Err(DraftError::NameTooLong {
                max: PROJECT_NAME_MAX_LEN,
                got: name.len(),
            });
        }
        Ok(())
    }
}

/// Partial update payload for a project; absent fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProjectPatch {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New project type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

/// Display metadata for a [`ProjectType`] value, served by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTypeMetadata {
    /// Human-readable label.
    pub label: String,
    /// One-line description.
    pub description: String,
    /// Icon (emoji or icon name).
    pub icon: String,
    /// Agent names commonly paired with this project type.
    #[serde(default)]
    pub suggested_agents: Vec<String>,
}

/// Display metadata for a [`ProjectStatus`] value, served by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStatusMetadata {
    /// Human-readable label.
    pub label: String,
    /// Suggested accent color.
    pub color: String,
    /// Icon (emoji or icon name).
    pub icon: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trips() {
        for tag in [
            ProjectType::WebApp,
            ProjectType::Api,
            ProjectType::DataAnalysis,
            ProjectType::Documentation,
            ProjectType::Database,
            ProjectType::General,
        ] {
            assert_eq!(tag.as_str().parse::<ProjectType>(), Ok(tag));
        }
        assert!("desktop".parse::<ProjectType>().is_err());
    }

    #[test]
    fn test_tag_wire_form() {
        assert_eq!(
            serde_json::to_string(&ProjectType::DataAnalysis).unwrap(),
            "\"data_analysis\""
        );
        let status: ProjectStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, ProjectStatus::Archived);
    }

    #[test]
    fn test_draft_validation() {
        assert!(ProjectDraft::new("Demo").validate().is_ok());
        assert_eq!(
            ProjectDraft::new("   ").validate(),
            Err(DraftError::EmptyName)
        );
        let long = "x".repeat(PROJECT_NAME_MAX_LEN + 1);
        assert!(matches!(
            ProjectDraft::new(long).validate(),
            Err(DraftError::NameTooLong { .. })
        ));
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = ProjectPatch {
            status: Some(ProjectStatus::Paused),
            ..ProjectPatch::default()
        };
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            "{\"status\":\"paused\"}"
        );
    }

    #[test]
    fn test_project_accepts_naive_timestamps() {
        let raw = r#"{
            "id": 1,
            "name": "Demo",
            "description": null,
            "project_type": "web_app",
            "status": "active",
            "created_at": "2024-05-01T10:00:00",
            "updated_at": "2024-05-01T10:00:00",
            "last_accessed": "2024-05-02T08:30:00"
        }"#;
        let project: Project = serde_json::from_str(raw).unwrap();
        assert_eq!(project.id, ProjectId::new(1));
        assert_eq!(project.project_type, ProjectType::WebApp);
    }
}
