//! Request helpers for the agent endpoints.

use super::config::ClientConfig;
use super::error::ApiResult;
use super::{check_status, endpoint};
use crate::model::{Agent, AgentDraft, AgentId, AgentPatch};

/// Base path for agent endpoints.
const AGENTS_PATH: &str = "/api/agents";

/// List all agents.
///
/// # Errors
/// Returns an error if the request or decoding fails.
pub async fn list(client: &reqwest::Client, config: &ClientConfig) -> ApiResult<Vec<Agent>> {
    let response = client.get(endpoint(config, AGENTS_PATH)?).send().await?;
    check_status(&response, AGENTS_PATH)?;
    Ok(response.json().await?)
}

/// Fetch one agent by id.
///
/// # Errors
/// Returns an error if the request or decoding fails.
pub async fn get(client: &reqwest::Client, config: &ClientConfig, id: AgentId) -> ApiResult<Agent> {
    let path = format!("{AGENTS_PATH}/{id}");
    let response = client.get(endpoint(config, &path)?).send().await?;
    check_status(&response, &path)?;
    Ok(response.json().await?)
}

/// Create an agent.
///
/// # Errors
/// Returns an error if the request or decoding fails.
pub async fn create(
    client: &reqwest::Client,
    config: &ClientConfig,
    draft: &AgentDraft,
) -> ApiResult<Agent> {
    let response = client
        .post(endpoint(config, AGENTS_PATH)?)
        .json(draft)
        .send()
        .await?;
    check_status(&response, AGENTS_PATH)?;
    Ok(response.json().await?)
}

/// Update an agent.
///
/// # Errors
/// Returns an error if the request or decoding fails.
pub async fn update(
    client: &reqwest::Client,
    config: &ClientConfig,
    id: AgentId,
    patch: &AgentPatch,
) -> ApiResult<Agent> {
    let path = format!("{AGENTS_PATH}/{id}");
    let response = client
        .put(endpoint(config, &path)?)
        .json(patch)
        .send()
        .await?;
    check_status(&response, &path)?;
    Ok(response.json().await?)
}

/// Delete an agent.
///
/// # Errors
/// Returns an error if the request fails.
pub async fn delete(client: &reqwest::Client, config: &ClientConfig, id: AgentId) -> ApiResult<()> {
    let path = format!("{AGENTS_PATH}/{id}");
    let response = client.delete(endpoint(config, &path)?).send().await?;
    check_status(&response, &path)
}
