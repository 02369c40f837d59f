//! Error classification and the user-facing texts failures resolve to.

use super::ConciergeError;

/// Exact text shown when a remote call could not complete.
pub const NETWORK_ERROR_TEXT: &str = "Network error. Please try again.";

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The remote call could not complete.
    Transport,
    /// The call completed but the payload signals failure.
    Semantic,
    /// A local precondition was not met; nothing was sent.
    Validation,
    Configuration,
}

/// A failure reduced to the text a user sees in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage(pub String);

impl UserMessage {
    /// Transport failures always read [`NETWORK_ERROR_TEXT`]; other failures
    /// prefer the server's message and fall back to `fallback`.
    pub fn for_error(error: &ConciergeError, fallback: &str) -> Self {
        if error.is_transport() {
            return Self(NETWORK_ERROR_TEXT.to_string());
        }
        Self(
            error
                .remote_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        )
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for UserMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
