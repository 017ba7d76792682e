//! Chat session state and the streaming turn machinery.
//!
//! [`store::SessionStore`] is the single source of truth for what is
//! currently displayed; [`turn::ActiveTurn`] is the per-turn state machine;
//! [`controller::ChatController`] wires both to the backend.

pub mod controller;
pub mod store;
pub mod turn;

pub use controller::{ChatController, drive_turn};
pub use store::SessionStore;
pub use turn::{ActiveTurn, RejectReason, TurnObserver, TurnOutcome, TurnPhase, TurnStep};
