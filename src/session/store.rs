//! Single source of truth for what the client currently displays.

use crate::model::{Agent, Conversation, ConversationId, Message, MessageId, Project};

/// State container for the active selections, the loaded conversation data,
/// and the transient streaming state of an in-flight turn.
///
/// Pure state: no network calls originate here, and every mutation goes
/// through a named transition. The streaming buffer and the message list are
/// never both authoritative for the same turn; the buffer is promoted into a
/// [`Message`] exactly once, by the turn state machine, at stream completion.
#[derive(Debug, Default)]
pub struct SessionStore {
    current_project: Option<Project>,
    current_agent: Option<Agent>,
    current_conversation: Option<ConversationId>,
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    streaming: bool,
    stream_buffer: String,
    epoch: u64,
    next_local_id: i64,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_local_id: -1,
            ..Self::default()
        }
    }

    // ----- Accessors -------------------------------------------------------

    /// Currently selected project.
    #[must_use]
    pub const fn project(&self) -> Option<&Project> {
        self.current_project.as_ref()
    }

    /// Currently selected agent.
    #[must_use]
    pub const fn agent(&self) -> Option<&Agent> {
        self.current_agent.as_ref()
    }

    /// Currently active conversation id.
    #[must_use]
    pub const fn conversation_id(&self) -> Option<ConversationId> {
        self.current_conversation
    }

    /// Conversations loaded for the active project.
    #[must_use]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Messages of the active conversation, in conversation order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a stream is currently active.
    #[must_use]
    pub const fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Assistant output accumulated so far for the in-flight turn.
    #[must_use]
    pub fn stream_buffer(&self) -> &str {
        &self.stream_buffer
    }

    /// Selection epoch; bumped by every transition that invalidates
    /// conversation-scoped state, so an in-flight turn can detect that it has
    /// been superseded.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    // ----- Selection transitions -------------------------------------------

    /// Select a project, or clear the selection.
    ///
    /// Switching projects invalidates all conversation-scoped state: the
    /// active conversation, the conversation list, the message list, and any
    /// in-flight streaming state.
    pub fn select_project(&mut self, project: Option<Project>) {
        self.current_project = project;
        self.current_conversation = None;
        self.conversations.clear();
        self.messages.clear();
        self.clear_stream_state();
        self.epoch += 1;
    }

    /// Select an agent, or clear the selection. Agent choice is independent
    /// of conversation history, so nothing else changes.
    pub fn select_agent(&mut self, agent: Option<Agent>) {
        self.current_agent = agent;
    }

    /// Activate a conversation (or none). Leftover streaming state from a
    /// previous turn is dropped; pair with [`Self::replace_messages`].
    pub fn select_conversation(&mut self, id: Option<ConversationId>) {
        self.current_conversation = id;
        self.clear_stream_state();
        self.epoch += 1;
    }

    /// Replace the visible message list.
    pub fn replace_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Activate a conversation from the locally-held list, loading its stored
    /// messages. Returns `false` (and changes nothing) if the id is unknown.
    pub fn open_local_conversation(&mut self, id: ConversationId) -> bool {
        let Some(conversation) = self.conversations.iter().find(|c| c.id == id) else {
            return false;
        };
        let messages = conversation.messages.clone();
        self.select_conversation(Some(id));
        self.replace_messages(messages);
        true
    }

    /// Replace the conversation list for the active project.
    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
    }

    /// Look up a loaded conversation by id.
    #[must_use]
    pub fn conversation(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    /// Start a fresh conversation: clears the active conversation id, the
    /// message list, and the streaming buffer, but keeps the project and
    /// agent selection. No conversation object exists yet; the backend
    /// allocates one lazily on the first message.
    pub fn start_new_conversation(&mut self) {
        self.current_conversation = None;
        self.messages.clear();
        self.clear_stream_state();
        self.epoch += 1;
    }

    /// Adopt the conversation id the backend assigned mid-stream. Unlike
    /// [`Self::select_conversation`] this does not invalidate anything; the
    /// turn that adopted it keeps running.
    pub fn adopt_conversation(&mut self, id: ConversationId) {
        self.current_conversation = Some(id);
    }

    // ----- Messages --------------------------------------------------------

    /// Append a message to the visible history. Append-only: never reorders
    /// or deduplicates; identity is the caller's concern.
    pub fn append_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Allocate a client-local placeholder message id (negative, unique
    /// within this store's lifetime).
    pub fn next_local_id(&mut self) -> MessageId {
        let id = MessageId::new(self.next_local_id);
        self.next_local_id -= 1;
        id
    }

    // ----- Streaming buffer lifecycle --------------------------------------

    /// Mark a stream active, dropping any stale buffer.
    pub fn begin_stream(&mut self) {
        self.streaming = true;
        self.stream_buffer.clear();
    }

    /// Append a fragment of assistant output to the transient buffer.
    pub fn append_stream_chunk(&mut self, chunk: &str) {
        self.stream_buffer.push_str(chunk);
    }

    /// Take the accumulated buffer for promotion into a [`Message`].
    pub fn take_stream_buffer(&mut self) -> String {
        std::mem::take(&mut self.stream_buffer)
    }

    /// Mark the stream finished and drop the buffer. Idempotent.
    pub fn end_stream(&mut self) {
        self.clear_stream_state();
    }

    fn clear_stream_state(&mut self) {
        self.streaming = false;
        self.stream_buffer.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{AgentId, MessageRole, ProjectId};
    use chrono::Utc;

    fn project(id: i64) -> Project {
        Project {
            id: ProjectId::new(id),
            name: format!("P{id}"),
            description: None,
            project_type: crate::model::ProjectType::General,
            status: crate::model::ProjectStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_accessed: Utc::now(),
        }
    }

    fn conversation(id: i64, messages: Vec<Message>) -> Conversation {
        Conversation {
            id: ConversationId::new(id),
            agent_id: AgentId::new(1),
            created_at: Utc::now(),
            messages,
        }
    }

    #[test]
    fn test_select_project_clears_conversation_scope() {
        let mut store = SessionStore::new();
        store.set_conversations(vec![conversation(42, vec![])]);
        store.select_conversation(Some(ConversationId::new(42)));
        let id = store.next_local_id();
        store.append_message(Message::user(id, Some(ConversationId::new(42)), "hi"));
        store.begin_stream();
        store.append_stream_chunk("partial");

        let before = store.epoch();
        store.select_project(Some(project(2)));

        assert!(store.conversation_id().is_none());
        assert!(store.conversations().is_empty());
        assert!(store.messages().is_empty());
        assert!(!store.is_streaming());
        assert!(store.stream_buffer().is_empty());
        assert!(store.epoch() > before);
    }

    #[test]
    fn test_select_agent_keeps_history() {
        let mut store = SessionStore::new();
        let id = store.next_local_id();
        store.append_message(Message::user(id, None, "hi"));
        store.select_agent(None);
        assert_eq!(store.messages().len(), 1);
    }

    #[test]
    fn test_open_local_conversation_restores_messages() {
        let mut store = SessionStore::new();
        let stored = Message::user(MessageId::new(7), Some(ConversationId::new(42)), "hello");
        store.set_conversations(vec![conversation(42, vec![stored.clone()])]);
        store.begin_stream();
        store.append_stream_chunk("leftover");
        store.start_new_conversation();

        assert!(store.open_local_conversation(ConversationId::new(42)));
        assert_eq!(store.conversation_id(), Some(ConversationId::new(42)));
        assert_eq!(store.messages(), &[stored]);
        assert!(store.stream_buffer().is_empty());

        assert!(!store.open_local_conversation(ConversationId::new(99)));
    }

    #[test]
    fn test_start_new_conversation_keeps_selections() {
        let mut store = SessionStore::new();
        store.select_project(Some(project(1)));
        store.select_conversation(Some(ConversationId::new(42)));
        let id = store.next_local_id();
        store.append_message(Message::user(id, None, "hi"));

        store.start_new_conversation();

        assert!(store.project().is_some());
        assert!(store.conversation_id().is_none());
        assert!(store.messages().is_empty());
    }

    #[test]
    fn test_end_stream_is_idempotent() {
        let mut store = SessionStore::new();
        store.begin_stream();
        store.append_stream_chunk("abc");
        store.end_stream();
        store.end_stream();
        assert!(!store.is_streaming());
        assert!(store.stream_buffer().is_empty());
    }

    #[test]
    fn test_local_ids_are_negative_and_unique() {
        let mut store = SessionStore::new();
        let first = store.next_local_id();
        let second = store.next_local_id();
        assert!(first.is_local());
        assert!(second.is_local());
        assert_ne!(first, second);
    }

    #[test]
    fn test_adopt_conversation_does_not_bump_epoch() {
        let mut store = SessionStore::new();
        let before = store.epoch();
        store.adopt_conversation(ConversationId::new(42));
        assert_eq!(store.epoch(), before);
        assert_eq!(store.conversation_id(), Some(ConversationId::new(42)));
    }

    #[test]
    fn test_append_message_preserves_order() {
        let mut store = SessionStore::new();
        let a = store.next_local_id();
        let b = store.next_local_id();
        store.append_message(Message::user(a, None, "first"));
        store.append_message(Message::assistant(b, None, "second"));
        let roles: Vec<MessageRole> = store.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![MessageRole::User, MessageRole::Assistant]);
    }
}
