//! State machine for one streamed chat turn.

use crate::model::{ConversationId, Message};
use crate::stream::StreamEvent;

use super::store::SessionStore;

/// Lifecycle phase of a chat turn. "Idle" is the absence of an
/// [`ActiveTurn`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TurnPhase {
    /// User message appended, stream not yet producing output.
    Sending,
    /// Content fragments are arriving.
    Streaming,
    /// Completion received, buffer being promoted.
    Finalizing,
    /// Ended without a promoted assistant message.
    Failed,
    /// Ended with the assistant message appended to history.
    Completed,
}

/// Why a submission was refused before any work happened.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RejectReason {
    /// Message text empty after trimming.
    EmptyMessage,
    /// No project selected.
    NoProject,
    /// No agent selected.
    NoAgent,
    /// A stream is already active for this session.
    StreamActive,
}

/// Final result of one chat turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Stream completed; the assistant reply is now in history.
    Completed {
        /// Conversation the turn belongs to, freshly adopted or pre-selected.
        conversation_id: Option<ConversationId>,
    },
    /// Stream errored in-band or at the transport level. The user's message
    /// stays in history; the partial assistant output is discarded. Never
    /// retried automatically.
    Failed {
        /// In-band or transport error description, when one was carried.
        error: Option<String>,
    },
    /// The selection changed while the stream was in flight; its remaining
    /// events were discarded without touching the new selection's state.
    Superseded,
    /// Preconditions not met; nothing happened.
    Rejected(RejectReason),
}

/// Hooks for a presentation layer to observe a turn as it progresses.
///
/// Implementations must be cheap; they run inline with event handling.
pub trait TurnObserver {
    /// The backend assigned a conversation id to this turn.
    fn on_conversation_assigned(&mut self, _id: ConversationId) {}

    /// A content fragment was appended to the streaming buffer.
    fn on_chunk(&mut self, _text: &str) {}
}

/// No-op observer.
impl TurnObserver for () {}

/// Result of applying one inbound event to a turn.
#[derive(Debug)]
pub enum TurnStep {
    /// Turn still in flight; keep pulling events.
    Continue,
    /// Turn over; stop pulling and drop the connection.
    Done(TurnOutcome),
}

/// One in-flight chat turn, tagged with the selection epoch it was opened
/// under so late events from a superseded selection can be discarded.
#[derive(Debug)]
pub struct ActiveTurn {
    epoch: u64,
    phase: TurnPhase,
    adopted: bool,
}

impl ActiveTurn {
    /// Begin a turn: marks the store streaming and records its epoch.
    #[must_use]
    pub fn begin(store: &mut SessionStore) -> Self {
        store.begin_stream();
        Self {
            epoch: store.epoch(),
            phase: TurnPhase::Sending,
            adopted: false,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Apply one inbound stream event.
    ///
    /// Events are handled strictly in arrival order: a conversation id is
    /// adopted at most once, content fragments are concatenated verbatim,
    /// `done` promotes the buffer into a permanent assistant message, and
    /// `error` discards the buffer. If the store's epoch no longer matches
    /// the one this turn was opened under, the event is dropped and the turn
    /// ends as superseded.
    pub fn apply<O: TurnObserver>(
        &mut self,
        store: &mut SessionStore,
        event: &StreamEvent,
        observer: &mut O,
    ) -> TurnStep {
        if store.epoch() != self.epoch {
            tracing::debug!("discarding stream event for superseded selection");
            return TurnStep::Done(TurnOutcome::Superseded);
        }

        if let Some(error) = &event.error {
            tracing::warn!("chat stream reported error: {error}");
            store.end_stream();
            self.phase = TurnPhase::Failed;
            return TurnStep::Done(TurnOutcome::Failed {
                error: Some(error.clone()),
            });
        }

        if let Some(id) = event.conversation_id
            && !self.adopted
            && store.conversation_id().is_none()
        {
            store.adopt_conversation(id);
            self.adopted = true;
            observer.on_conversation_assigned(id);
        }

        if let Some(content) = &event.content {
            store.append_stream_chunk(content);
            self.phase = TurnPhase::Streaming;
            observer.on_chunk(content);
        }

        if event.done {
            self.phase = TurnPhase::Finalizing;
            let conversation_id = store.conversation_id();
            let text = store.take_stream_buffer();
            let id = store.next_local_id();
            store.append_message(Message::assistant(id, conversation_id, text));
            store.end_stream();
            self.phase = TurnPhase::Completed;
            return TurnStep::Done(TurnOutcome::Completed { conversation_id });
        }

        TurnStep::Continue
    }

    /// End the turn after a transport-level failure, or after the connection
    /// closed without a completion or error event. No assistant message is
    /// promoted and the buffer is discarded.
    pub fn fail(&mut self, store: &mut SessionStore, error: Option<String>) -> TurnOutcome {
        if store.epoch() == self.epoch {
            store.end_stream();
        }
        self.phase = TurnPhase::Failed;
        TurnOutcome::Failed { error }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{ConversationId, MessageRole};

    fn apply(turn: &mut ActiveTurn, store: &mut SessionStore, event: &StreamEvent) -> TurnStep {
        turn.apply(store, event, &mut ())
    }

    #[test]
    fn test_promoted_text_is_exact_concatenation() {
        let mut store = SessionStore::new();
        let mut turn = ActiveTurn::begin(&mut store);

        for fragment in ["Hel", "lo", "", " world"] {
            let step = apply(&mut turn, &mut store, &StreamEvent::content(fragment));
            assert!(matches!(step, TurnStep::Continue));
        }
        let step = apply(&mut turn, &mut store, &StreamEvent::done());

        let TurnStep::Done(TurnOutcome::Completed { .. }) = step else {
            panic!("expected completion");
        };
        assert_eq!(turn.phase(), TurnPhase::Completed);
        let last = store.messages().last().unwrap();
        assert_eq!(last.role, MessageRole::Assistant);
        assert_eq!(last.content, "Hello world");
        assert!(last.id.is_local());
        assert!(!store.is_streaming());
        assert!(store.stream_buffer().is_empty());
    }

    #[test]
    fn test_conversation_adopted_exactly_once() {
        let mut store = SessionStore::new();
        let mut turn = ActiveTurn::begin(&mut store);

        apply(
            &mut turn,
            &mut store,
            &StreamEvent::conversation(ConversationId::new(42)),
        );
        assert_eq!(store.conversation_id(), Some(ConversationId::new(42)));

        // A second id on the same stream must not change the selection.
        apply(
            &mut turn,
            &mut store,
            &StreamEvent::conversation(ConversationId::new(99)),
        );
        assert_eq!(store.conversation_id(), Some(ConversationId::new(42)));
    }

    #[test]
    fn test_preselected_conversation_is_kept() {
        let mut store = SessionStore::new();
        store.select_conversation(Some(ConversationId::new(7)));
        let mut turn = ActiveTurn::begin(&mut store);

        apply(
            &mut turn,
            &mut store,
            &StreamEvent::conversation(ConversationId::new(42)),
        );
        assert_eq!(store.conversation_id(), Some(ConversationId::new(7)));
    }

    #[test]
    fn test_error_discards_partial_output() {
        let mut store = SessionStore::new();
        let mut turn = ActiveTurn::begin(&mut store);

        apply(&mut turn, &mut store, &StreamEvent::content("Par"));
        let step = apply(&mut turn, &mut store, &StreamEvent::error("model timeout"));

        let TurnStep::Done(TurnOutcome::Failed { error }) = step else {
            panic!("expected failure");
        };
        assert_eq!(error.as_deref(), Some("model timeout"));
        assert_eq!(turn.phase(), TurnPhase::Failed);
        assert!(store.messages().is_empty());
        assert!(!store.is_streaming());
        assert!(store.stream_buffer().is_empty());
    }

    #[test]
    fn test_selection_change_supersedes_turn() {
        let mut store = SessionStore::new();
        let mut turn = ActiveTurn::begin(&mut store);
        apply(&mut turn, &mut store, &StreamEvent::content("Par"));

        // User starts a new conversation while the stream is in flight.
        store.start_new_conversation();

        let step = apply(&mut turn, &mut store, &StreamEvent::done());
        assert!(matches!(step, TurnStep::Done(TurnOutcome::Superseded)));
        // The late completion must not have promoted anything.
        assert!(store.messages().is_empty());
    }

    #[test]
    fn test_transport_failure_ends_turn_without_promotion() {
        let mut store = SessionStore::new();
        let mut turn = ActiveTurn::begin(&mut store);
        apply(&mut turn, &mut store, &StreamEvent::content("Par"));

        let outcome = turn.fail(&mut store, None);
        assert_eq!(outcome, TurnOutcome::Failed { error: None });
        assert!(!store.is_streaming());
        assert!(store.messages().is_empty());
    }
}
