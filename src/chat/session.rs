//! Single-flight conversation session.

use std::sync::Arc;

use crate::agent::{AgentClient, AgentInvocationResult, ResponseExtractor};
use crate::error::unified::NETWORK_ERROR_TEXT;
use crate::types::Message;

/// Reply text when the agent reports failure without saying why.
pub const GENERIC_FAILURE_TEXT: &str = "Sorry, something went wrong. Please try again.";

/// Whether the session may dispatch a new turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingReply,
}

/// Proof that a turn was dispatched; consumed by [`ConversationSession::complete`].
#[derive(Debug)]
#[must_use = "a pending turn must be completed or abandoned"]
pub struct PendingTurn {
    prompt: String,
}

impl PendingTurn {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// An append-only message log driven through a remote agent.
///
/// At most one agent call is outstanding at a time. [`begin`](Self::begin)
/// refuses new turns while a reply is pending, independently of whatever
/// input disabling the caller does.
pub struct ConversationSession {
    client: Arc<dyn AgentClient>,
    agent_id: String,
    extractor: ResponseExtractor,
    messages: Vec<Message>,
    state: SessionState,
}

impl std::fmt::Debug for ConversationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationSession")
            .field("agent_id", &self.agent_id)
            .field("messages", &self.messages.len())
            .field("state", &self.state)
            .finish()
    }
}

impl ConversationSession {
    pub fn new(client: Arc<dyn AgentClient>, agent_id: impl Into<String>) -> Self {
        Self {
            client,
            agent_id: agent_id.into(),
            extractor: ResponseExtractor::conversation(),
            messages: Vec::new(),
            state: SessionState::Idle,
        }
    }

    pub fn with_extractor(mut self, extractor: ResponseExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.state == SessionState::AwaitingReply
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// The agent currently working on this session's behalf, if any.
    pub fn active_agent(&self) -> Option<&str> {
        self.is_awaiting_reply().then_some(self.agent_id.as_str())
    }

    /// Replace the log with a prepared one. Refused while a reply is pending.
    pub fn seed(&mut self, messages: Vec<Message>) -> bool {
        if self.is_awaiting_reply() {
            return false;
        }
        self.messages = messages;
        true
    }

    /// Append the user turn and move to `AwaitingReply`.
    ///
    /// Returns `None`, changing nothing, when the trimmed text is empty or a
    /// reply is already pending.
    pub fn begin(&mut self, text: &str) -> Option<PendingTurn> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if self.is_awaiting_reply() {
            tracing::debug!(agent_id = %self.agent_id, "send ignored: reply pending");
            return None;
        }

        self.messages.push(Message::user(text));
        self.state = SessionState::AwaitingReply;
        Some(PendingTurn {
            prompt: text.to_string(),
        })
    }

    /// Append exactly one agent turn for `result` and return to `Idle`.
    pub fn complete(&mut self, _turn: PendingTurn, result: &AgentInvocationResult) -> &Message {
        let reply = if result.success {
            Message::agent(self.extractor.extract(result.raw_response.as_ref()))
        } else if result.is_transport_failure() {
            Message::agent_error(NETWORK_ERROR_TEXT)
        } else {
            Message::agent(result.error_message().unwrap_or(GENERIC_FAILURE_TEXT))
        };

        self.messages.push(reply);
        self.state = SessionState::Idle;
        &self.messages[self.messages.len() - 1]
    }

    /// Drop a pending turn without a reply and return to `Idle`.
    pub fn abandon(&mut self, _turn: PendingTurn) {
        self.state = SessionState::Idle;
    }

    /// Send `text` and wait for the reply.
    ///
    /// Returns the appended agent message, or `None` when the send was a
    /// no-op. If this future is dropped before the reply arrives, the session
    /// returns to `Idle` and the reply is never appended.
    pub async fn send(&mut self, text: &str) -> Option<&Message> {
        let turn = self.begin(text)?;

        let guard = ResetOnDrop::new(&mut self.state);
        let result = self.client.invoke(turn.prompt(), &self.agent_id).await;
        guard.disarm();

        Some(self.complete(turn, &result))
    }
}

/// Returns the session to `Idle` if an in-flight send is cancelled.
struct ResetOnDrop<'a> {
    state: &'a mut SessionState,
    armed: bool,
}

impl<'a> ResetOnDrop<'a> {
    fn new(state: &'a mut SessionState) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            *self.state = SessionState::Idle;
        }
    }
}
