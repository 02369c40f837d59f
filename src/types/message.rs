//! Conversation log entries.

use chrono::Local;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Display format for message timestamps (e.g. `10:31 AM`).
pub const TIMESTAMP_FORMAT: &str = "%I:%M %p";

/// Who authored a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

/// A single conversation entry. Fields are read-only once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    id: String,
    role: Role,
    text: String,
    timestamp: String,
}

impl Message {
    /// A user turn stamped with the current local time.
    pub fn user(text: impl Into<String>) -> Self {
        Self::stamped("u", Role::User, text.into())
    }

    /// An agent reply stamped with the current local time.
    pub fn agent(text: impl Into<String>) -> Self {
        Self::stamped("a", Role::Agent, text.into())
    }

    /// A synthetic agent turn reporting that the call never completed.
    pub fn agent_error(text: impl Into<String>) -> Self {
        Self::stamped("e", Role::Agent, text.into())
    }

    /// A message with caller-supplied id and timestamp (prepared logs).
    pub fn with_parts(
        id: impl Into<String>,
        role: Role,
        text: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            text: text.into(),
            timestamp: timestamp.into(),
        }
    }

    fn stamped(prefix: &str, role: Role, text: String) -> Self {
        Self {
            id: format!("{prefix}-{}", Uuid::new_v4().simple()),
            role,
            text,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}
