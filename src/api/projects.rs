//! Request helpers for the project endpoints.

use std::collections::BTreeMap;

use super::config::ClientConfig;
use super::error::ApiResult;
use super::{check_status, endpoint};
use crate::model::{
    Project, ProjectDraft, ProjectId, ProjectPatch, ProjectStatus, ProjectStatusMetadata,
    ProjectType, ProjectTypeMetadata,
};

/// Base path for project endpoints.
const PROJECTS_PATH: &str = "/api/projects";

/// List all projects.
///
/// # Errors
/// Returns an error if the request or decoding fails.
pub async fn list(client: &reqwest::Client, config: &ClientConfig) -> ApiResult<Vec<Project>> {
    let response = client.get(endpoint(config, PROJECTS_PATH)?).send().await?;
    check_status(&response, PROJECTS_PATH)?;
    Ok(response.json().await?)
}

/// Fetch one project by id.
///
/// # Errors
/// Returns an error if the request or decoding fails.
pub async fn get(
    client: &reqwest::Client,
    config: &ClientConfig,
    id: ProjectId,
) -> ApiResult<Project> {
    let path = format!("{PROJECTS_PATH}/{id}");
    let response = client.get(endpoint(config, &path)?).send().await?;
    check_status(&response, &path)?;
    Ok(response.json().await?)
}

/// Create a project.
///
/// # Errors
/// Returns an error if the request or decoding fails.
pub async fn create(
    client: &reqwest::Client,
    config: &ClientConfig,
    draft: &ProjectDraft,
) -> ApiResult<Project> {
    let response = client
        .post(endpoint(config, PROJECTS_PATH)?)
        .json(draft)
        .send()
        .await?;
    check_status(&response, PROJECTS_PATH)?;
    Ok(response.json().await?)
}

/// Update a project.
///
/// # Errors
/// Returns an error if the request or decoding fails.
pub async fn update(
    client: &reqwest::Client,
    config: &ClientConfig,
    id: ProjectId,
    patch: &ProjectPatch,
) -> ApiResult<Project> {
    let path = format!("{PROJECTS_PATH}/{id}");
    let response = client
        .put(endpoint(config, &path)?)
        .json(patch)
        .send()
        .await?;
    check_status(&response, &path)?;
    Ok(response.json().await?)
}

/// Delete a project.
///
/// # Errors
/// Returns an error if the request fails.
pub async fn delete(
    client: &reqwest::Client,
    config: &ClientConfig,
    id: ProjectId,
) -> ApiResult<()> {
    let path = format!("{PROJECTS_PATH}/{id}");
    let response = client.delete(endpoint(config, &path)?).send().await?;
    check_status(&response, &path)
}

/// Bump a project's last-accessed timestamp.
///
/// # Errors
/// Returns an error if the request fails.
pub async fn touch(
    client: &reqwest::Client,
    config: &ClientConfig,
    id: ProjectId,
) -> ApiResult<()> {
    let path = format!("{PROJECTS_PATH}/{id}/access");
    let response = client.patch(endpoint(config, &path)?).send().await?;
    check_status(&response, &path)
}

/// Fetch display metadata for every project type.
///
/// # Errors
/// Returns an error if the request or decoding fails.
pub async fn type_metadata(
    client: &reqwest::Client,
    config: &ClientConfig,
) -> ApiResult<BTreeMap<ProjectType, ProjectTypeMetadata>> {
    let path = format!("{PROJECTS_PATH}/metadata/types");
    let response = client.get(endpoint(config, &path)?).send().await?;
    check_status(&response, &path)?;
    Ok(response.json().await?)
}

/// Fetch display metadata for every project status.
///
/// # Errors
/// Returns an error if the request or decoding fails.
pub async fn status_metadata(
    client: &reqwest::Client,
    config: &ClientConfig,
) -> ApiResult<BTreeMap<ProjectStatus, ProjectStatusMetadata>> {
    let path = format!("{PROJECTS_PATH}/metadata/statuses");
    let response = client.get(endpoint(config, &path)?).send().await?;
    check_status(&response, &path)?;
    Ok(response.json().await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_type_metadata_decodes_keyed_map() {
        let raw = r#"{
            "web_app": {
                "label": "Web Application",
                "description": "Full-stack web application",
                "icon": "globe",
                "suggested_agents": ["Frontend Developer"]
            },
            "general": {
                "label": "General Project",
                "description": "Custom project",
                "icon": "folder"
            }
        }"#;
        let map: BTreeMap<ProjectType, ProjectTypeMetadata> = serde_json::from_str(raw).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&ProjectType::WebApp].label, "Web Application");
        assert!(map[&ProjectType::General].suggested_agents.is_empty());
    }
}
