//! Error types for Concierge.

pub mod unified;

pub use unified::{ErrorCategory, UserMessage};

use thiserror::Error;

/// Primary error type for all Concierge operations.
#[derive(Error, Debug)]
pub enum ConciergeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Remote service rejected the request: {}", message.as_deref().unwrap_or("no details"))]
    Rejected { message: Option<String> },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl ConciergeError {
    /// Create an API error from a status code and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a rejection carrying the remote service's own message, if any.
    pub fn rejected(message: Option<String>) -> Self {
        Self::Rejected {
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(_) | Self::Io(_) | Self::Timeout(_) => ErrorCategory::Transport,
            Self::Api { .. } | Self::Rejected { .. } | Self::Serialization(_) => {
                ErrorCategory::Semantic
            }
            Self::InvalidArgument(_) | Self::InvalidState(_) => ErrorCategory::Validation,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }

    /// Whether the remote call never completed.
    pub fn is_transport(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    /// The message supplied by the remote service, when it sent one.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } if !message.trim().is_empty() => Some(message),
            Self::Rejected { message } => message.as_deref(),
            _ => None,
        }
    }

    /// Text suitable for an in-place status banner.
    pub fn user_message(&self, fallback: &str) -> UserMessage {
        UserMessage::for_error(self, fallback)
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ConciergeError>;
