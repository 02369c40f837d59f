//! Conversation with the team info agent.

pub mod session;

pub use session::{ConversationSession, PendingTurn, SessionState, GENERIC_FAILURE_TEXT};
