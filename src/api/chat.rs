//! Request helpers for conversation history and the chat stream.

use reqwest::header::ACCEPT;

use super::config::ClientConfig;
use super::error::ApiResult;
use super::{check_status, endpoint};
use crate::model::{ChatRequest, Conversation, ConversationId, Message, ProjectId};
use crate::stream::ChatStream;

/// Base path for chat endpoints.
const CHAT_PATH: &str = "/api/chat";

/// List a project's conversations, each with its messages embedded.
///
/// # Errors
/// Returns an error if the request or decoding fails.
pub async fn list_conversations(
    client: &reqwest::Client,
    config: &ClientConfig,
    project_id: ProjectId,
) -> ApiResult<Vec<Conversation>> {
    let path = format!("{CHAT_PATH}/conversations/{project_id}");
    let response = client.get(endpoint(config, &path)?).send().await?;
    check_status(&response, &path)?;
    Ok(response.json().await?)
}

/// List the messages of one conversation.
///
/// # Errors
/// Returns an error if the request or decoding fails.
pub async fn list_messages(
    client: &reqwest::Client,
    config: &ClientConfig,
    conversation_id: ConversationId,
) -> ApiResult<Vec<Message>> {
    let path = format!("{CHAT_PATH}/messages/{conversation_id}");
    let response = client.get(endpoint(config, &path)?).send().await?;
    check_status(&response, &path)?;
    Ok(response.json().await?)
}

/// Open the server-sent-event stream for one chat turn.
///
/// The backend emits one JSON event per line of interest: a conversation id
/// (assigned once), content fragments, and a final `done` or `error` marker,
/// after which it closes the stream itself.
///
/// # Errors
/// Returns an error if the connection cannot be established or the backend
/// refuses the request.
pub async fn open_stream(
    client: &reqwest::Client,
    config: &ClientConfig,
    request: &ChatRequest,
) -> ApiResult<ChatStream> {
    let path = format!("{CHAT_PATH}/stream");
    let response = client
        .get(endpoint(config, &path)?)
        .query(&request.query_params())
        .header(ACCEPT, "text/event-stream")
        .send()
        .await?;
    check_status(&response, &path)?;
    Ok(ChatStream::from_response(response))
}
