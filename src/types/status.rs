//! Dismissable status banners shown next to the triggering control.

use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatusKind {
    #[default]
    None,
    Success,
    Error,
}

/// Exactly one banner state is active at a time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == StatusKind::None
    }

    pub fn is_success(&self) -> bool {
        self.kind == StatusKind::Success
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }

    /// Reset to `{none, ""}`.
    pub fn clear(&mut self) {
        *self = Self::none();
    }
}
