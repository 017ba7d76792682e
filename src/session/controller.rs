//! Controller executing one chat turn end-to-end.

use futures::{Stream, StreamExt};

use crate::api::{ApiClient, ApiError};
use crate::model::{ChatRequest, Message};
use crate::stream::StreamEvent;

use super::store::SessionStore;
use super::turn::{ActiveTurn, RejectReason, TurnObserver, TurnOutcome, TurnStep};

/// Drives streamed chat turns against the session store.
///
/// One turn at a time: a submission while a stream is active is refused, the
/// same way the web client disables its input while streaming. Errors never
/// propagate out of a turn; a failed turn leaves the user's message in
/// history, promotes nothing, and is reported through [`TurnOutcome`].
pub struct ChatController {
    api: ApiClient,
}

impl ChatController {
    /// Create a controller around an API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Borrow the underlying API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Execute one chat turn.
    ///
    /// Preconditions (checked here, refused silently): non-empty message
    /// after trimming, a selected project, a selected agent, and no stream
    /// already active. When they hold, the user message is appended
    /// immediately as an optimistic local echo, one stream is opened, and
    /// inbound events drive the store until completion or failure.
    pub async fn send_message<O: TurnObserver>(
        &self,
        store: &mut SessionStore,
        text: &str,
        observer: &mut O,
    ) -> TurnOutcome {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("submission refused: empty message");
            return TurnOutcome::Rejected(RejectReason::EmptyMessage);
        }
        let Some(project_id) = store.project().map(|p| p.id) else {
            tracing::debug!("submission refused: no project selected");
            return TurnOutcome::Rejected(RejectReason::NoProject);
        };
        let Some(agent_id) = store.agent().map(|a| a.id) else {
            tracing::debug!("submission refused: no agent selected");
            return TurnOutcome::Rejected(RejectReason::NoAgent);
        };
        if store.is_streaming() {
            tracing::debug!("submission refused: a stream is already active");
            return TurnOutcome::Rejected(RejectReason::StreamActive);
        }

        let request = ChatRequest {
            message: text.to_string(),
            project_id,
            agent_id,
            conversation_id: store.conversation_id(),
        };

        let mut turn = ActiveTurn::begin(store);

        // Optimistic local echo: the send is visible before any network
        // round-trip completes, and is never rolled back.
        let echo_id = store.next_local_id();
        store.append_message(Message::user(echo_id, store.conversation_id(), text));

        let mut events = match self.api.open_chat_stream(&request).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!("failed to open chat stream: {e}");
                return turn.fail(store, Some(e.to_string()));
            }
        };

        drive_turn(store, &mut turn, &mut events, observer).await
    }
}

/// Pull events from a stream and apply them to an in-flight turn until it
/// ends. Transport failures and a connection that closes without a terminal
/// event both end the turn as failed.
pub async fn drive_turn<S, O>(
    store: &mut SessionStore,
    turn: &mut ActiveTurn,
    events: &mut S,
    observer: &mut O,
) -> TurnOutcome
where
    S: Stream<Item = Result<StreamEvent, ApiError>> + Unpin,
    O: TurnObserver,
{
    while let Some(item) = events.next().await {
        match item {
            Ok(event) => match turn.apply(store, &event, observer) {
                TurnStep::Continue => {}
                TurnStep::Done(outcome) => return outcome,
            },
            Err(e) => {
                tracing::warn!("chat stream transport failure: {e}");
                return turn.fail(store, Some(e.to_string()));
            }
        }
    }
    tracing::warn!("chat stream closed without a completion event");
    turn.fail(store, None)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{
        Agent, AgentId, ConversationId, MessageRole, Project, ProjectId, ProjectStatus,
        ProjectType,
    };
    use chrono::Utc;
    use futures::stream;

    fn project(id: i64) -> Project {
        Project {
            id: ProjectId::new(id),
            name: format!("P{id}"),
            description: None,
            project_type: ProjectType::General,
            status: ProjectStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_accessed: Utc::now(),
        }
    }

    fn agent(id: i64) -> Agent {
        Agent {
            id: AgentId::new(id),
            name: format!("A{id}"),
            description: None,
            base_model: "ministral-3:8b".to_string(),
            system_prompt: None,
            temperature: 0.7,
            max_tokens: 2048,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn selected_store() -> SessionStore {
        let mut store = SessionStore::new();
        store.select_project(Some(project(1)));
        store.select_agent(Some(agent(2)));
        store
    }

    async fn run_turn(store: &mut SessionStore, events: Vec<StreamEvent>) -> TurnOutcome {
        let mut turn = ActiveTurn::begin(store);
        let echo_id = store.next_local_id();
        store.append_message(Message::user(echo_id, store.conversation_id(), "Hello"));
        let mut stream = stream::iter(events.into_iter().map(Ok));
        drive_turn(store, &mut turn, &mut stream, &mut ()).await
    }

    #[tokio::test]
    async fn test_happy_path_turn() {
        let mut store = selected_store();
        let outcome = run_turn(
            &mut store,
            vec![
                StreamEvent::conversation(ConversationId::new(42)),
                StreamEvent::content("Hi"),
                StreamEvent::content(" there"),
                StreamEvent::done(),
            ],
        )
        .await;

        assert_eq!(
            outcome,
            TurnOutcome::Completed {
                conversation_id: Some(ConversationId::new(42))
            }
        );
        assert_eq!(store.conversation_id(), Some(ConversationId::new(42)));
        assert!(!store.is_streaming());

        let contents: Vec<(MessageRole, &str)> = store
            .messages()
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .collect();
        assert_eq!(
            contents,
            vec![
                (MessageRole::User, "Hello"),
                (MessageRole::Assistant, "Hi there"),
            ]
        );
    }

    #[tokio::test]
    async fn test_mid_stream_error_leaves_only_user_message() {
        let mut store = selected_store();
        let outcome = run_turn(
            &mut store,
            vec![
                StreamEvent::conversation(ConversationId::new(42)),
                StreamEvent::content("Par"),
                StreamEvent::error("model timeout"),
            ],
        )
        .await;

        assert_eq!(
            outcome,
            TurnOutcome::Failed {
                error: Some("model timeout".to_string())
            }
        );
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].role, MessageRole::User);
        assert!(!store.is_streaming());
        assert!(store.stream_buffer().is_empty());
    }

    #[tokio::test]
    async fn test_stream_closing_early_fails_the_turn() {
        let mut store = selected_store();
        let outcome = run_turn(&mut store, vec![StreamEvent::content("Par")]).await;
        assert_eq!(outcome, TurnOutcome::Failed { error: None });
        assert_eq!(store.messages().len(), 1);
        assert!(!store.is_streaming());
    }

    #[tokio::test]
    async fn test_preconditions_refuse_silently() {
        let controller = ChatController::new(ApiClient::with_defaults().unwrap());

        // No project, no agent.
        let mut store = SessionStore::new();
        let outcome = controller.send_message(&mut store, "Hello", &mut ()).await;
        assert_eq!(outcome, TurnOutcome::Rejected(RejectReason::NoProject));
        assert!(store.messages().is_empty());
        assert!(!store.is_streaming());

        // Project but no agent.
        store.select_project(Some(project(1)));
        let outcome = controller.send_message(&mut store, "Hello", &mut ()).await;
        assert_eq!(outcome, TurnOutcome::Rejected(RejectReason::NoAgent));
        assert!(store.messages().is_empty());

        // Whitespace-only message.
        store.select_agent(Some(agent(2)));
        let outcome = controller.send_message(&mut store, "   ", &mut ()).await;
        assert_eq!(outcome, TurnOutcome::Rejected(RejectReason::EmptyMessage));
        assert!(store.messages().is_empty());
        assert!(!store.is_streaming());

        // Stream already active.
        store.begin_stream();
        let outcome = controller.send_message(&mut store, "Hello", &mut ()).await;
        assert_eq!(outcome, TurnOutcome::Rejected(RejectReason::StreamActive));
        assert!(store.messages().is_empty());
    }

    #[tokio::test]
    async fn test_observer_sees_chunks_and_adoption() {
        struct Recorder {
            chunks: Vec<String>,
            assigned: Option<ConversationId>,
        }
        impl TurnObserver for Recorder {
            fn on_conversation_assigned(&mut self, id: ConversationId) {
                self.assigned = Some(id);
            }
            fn on_chunk(&mut self, text: &str) {
                self.chunks.push(text.to_string());
            }
        }

        let mut store = selected_store();
        let mut turn = ActiveTurn::begin(&mut store);
        let mut recorder = Recorder {
            chunks: Vec::new(),
            assigned: None,
        };
        let mut events = stream::iter(
            vec![
                StreamEvent::conversation(ConversationId::new(42)),
                StreamEvent::content("Hi"),
                StreamEvent::content(" there"),
                StreamEvent::done(),
            ]
            .into_iter()
            .map(Ok),
        );

        drive_turn(&mut store, &mut turn, &mut events, &mut recorder).await;
        assert_eq!(recorder.assigned, Some(ConversationId::new(42)));
        assert_eq!(recorder.chunks, vec!["Hi", " there"]);
    }
}
