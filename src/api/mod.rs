//! HTTP client for the NeuroLine backend REST API.
//!
//! Plain request/response operations for projects, agents, and conversation
//! history, plus the entry point for the streaming chat endpoint. No retries
//! and no client-side caching; mutations are expected to be followed by a
//! fresh list fetch by the caller.

pub mod agents;
pub mod chat;
pub mod config;
pub mod error;
pub mod projects;

pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};

use std::collections::BTreeMap;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use url::Url;

use crate::model::{
    Agent, AgentDraft, AgentId, AgentPatch, ChatRequest, Conversation, ConversationId, Message,
    Project, ProjectDraft, ProjectId, ProjectPatch, ProjectStatus, ProjectStatusMetadata,
    ProjectType, ProjectTypeMetadata,
};
use crate::stream::ChatStream;

/// Client for the backend HTTP surface.
///
/// Holds two `reqwest` clients: one with a total request timeout for plain
/// calls, and one without it for the long-lived chat stream response.
pub struct ApiClient {
    config: ClientConfig,
    http: reqwest::Client,
    streaming: reqwest::Client,
}

impl ApiClient {
    /// Create a client from the given configuration.
    ///
    /// # Errors
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let http = build_client(&config, true)?;
        let streaming = build_client(&config, false)?;
        Ok(Self {
            config,
            http,
            streaming,
        })
    }

    /// Create a client with default configuration.
    ///
    /// # Errors
    /// Returns an error if an HTTP client cannot be built.
    pub fn with_defaults() -> ApiResult<Self> {
        Self::new(ClientConfig::default())
    }

    /// Borrow the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ----- Projects --------------------------------------------------------

    /// List all projects.
    ///
    /// # Errors
    /// Returns an error if the request or decoding fails.
    pub async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        projects::list(&self.http, &self.config).await
    }

    /// Fetch one project by id.
    ///
    /// # Errors
    /// Returns an error if the request fails; 404 maps to
    /// [`ApiError::Status`] (see [`ApiError::is_not_found`]).
    pub async fn get_project(&self, id: ProjectId) -> ApiResult<Project> {
        projects::get(&self.http, &self.config, id).await
    }

    /// Create a project.
    ///
    /// # Errors
    /// Returns an error if the request or decoding fails.
    pub async fn create_project(&self, draft: &ProjectDraft) -> ApiResult<Project> {
        projects::create(&self.http, &self.config, draft).await
    }

    /// Update a project.
    ///
    /// # Errors
    /// Returns an error if the request or decoding fails.
    pub async fn update_project(&self, id: ProjectId, patch: &ProjectPatch) -> ApiResult<Project> {
        projects::update(&self.http, &self.config, id, patch).await
    }

    /// Delete a project. Conversations it owns are removed by the backend.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn delete_project(&self, id: ProjectId) -> ApiResult<()> {
        projects::delete(&self.http, &self.config, id).await
    }

    /// Bump a project's last-accessed timestamp.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn touch_project(&self, id: ProjectId) -> ApiResult<()> {
        projects::touch(&self.http, &self.config, id).await
    }

    /// Fetch display metadata for every project type.
    ///
    /// # Errors
    /// Returns an error if the request or decoding fails.
    pub async fn project_type_metadata(
        &self,
    ) -> ApiResult<BTreeMap<ProjectType, ProjectTypeMetadata>> {
        projects::type_metadata(&self.http, &self.config).await
    }

    /// Fetch display metadata for every project status.
    ///
    /// # Errors
    /// Returns an error if the request or decoding fails.
    pub async fn project_status_metadata(
        &self,
    ) -> ApiResult<BTreeMap<ProjectStatus, ProjectStatusMetadata>> {
        projects::status_metadata(&self.http, &self.config).await
    }

    // ----- Agents ----------------------------------------------------------

    /// List all agents.
    ///
    /// # Errors
    /// Returns an error if the request or decoding fails.
    pub async fn list_agents(&self) -> ApiResult<Vec<Agent>> {
        agents::list(&self.http, &self.config).await
    }

    /// Fetch one agent by id.
    ///
    /// # Errors
    /// Returns an error if the request or decoding fails.
    pub async fn get_agent(&self, id: AgentId) -> ApiResult<Agent> {
        agents::get(&self.http, &self.config, id).await
    }

    /// Create an agent.
    ///
    /// # Errors
    /// Returns an error if the request or decoding fails.
    pub async fn create_agent(&self, draft: &AgentDraft) -> ApiResult<Agent> {
        agents::create(&self.http, &self.config, draft).await
    }

    /// Update an agent.
    ///
    /// # Errors
    /// Returns an error if the request or decoding fails.
    pub async fn update_agent(&self, id: AgentId, patch: &AgentPatch) -> ApiResult<Agent> {
        agents::update(&self.http, &self.config, id, patch).await
    }

    /// Delete an agent.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn delete_agent(&self, id: AgentId) -> ApiResult<()> {
        agents::delete(&self.http, &self.config, id).await
    }

    // ----- Chat ------------------------------------------------------------

    /// List a project's conversations, each with its messages embedded.
    ///
    /// # Errors
    /// Returns an error if the request or decoding fails.
    pub async fn list_conversations(&self, project_id: ProjectId) -> ApiResult<Vec<Conversation>> {
        chat::list_conversations(&self.http, &self.config, project_id).await
    }

    /// List the messages of one conversation.
    ///
    /// # Errors
    /// Returns an error if the request or decoding fails.
    pub async fn list_messages(&self, conversation_id: ConversationId) -> ApiResult<Vec<Message>> {
        chat::list_messages(&self.http, &self.config, conversation_id).await
    }

    /// Open the server-sent-event stream for one chat turn.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established.
    pub async fn open_chat_stream(&self, request: &ChatRequest) -> ApiResult<ChatStream> {
        chat::open_stream(&self.streaming, &self.config, request).await
    }
}

/// Build an HTTP client with appropriate headers and timeouts.
fn build_client(config: &ClientConfig, with_request_timeout: bool) -> ApiResult<reqwest::Client> {
    let mut headers = HeaderMap::new();
    if let Ok(ua) = HeaderValue::from_str(&config.user_agent) {
        headers.insert(USER_AGENT, ua);
    }
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(config.connect_timeout)
        .gzip(true)
        .brotli(true)
        .deflate(true);
    if with_request_timeout {
        builder = builder.timeout(config.request_timeout);
    }
    builder
        .build()
        .map_err(|e| ApiError::Config(format!("HTTP client: {e}")))
}

/// Resolve an endpoint path against the configured base URL.
pub(crate) fn endpoint(config: &ClientConfig, path: &str) -> ApiResult<Url> {
    Ok(Url::parse(&config.base_url)?.join(path)?)
}

/// Map a non-success status to [`ApiError::Status`].
pub(crate) fn check_status(response: &reqwest::Response, path: &str) -> ApiResult<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Status {
            status,
            endpoint: path.to_string(),
        })
    }
}
