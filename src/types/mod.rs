//! Core types shared across Concierge.

pub mod message;
pub mod status;

pub use message::{Message, Role};
pub use status::{Status, StatusKind};
