//! Concierge: agent interaction and knowledge base lifecycle.
//!
//! Talks to a hosted agent service on behalf of a front end: a free-form
//! chat session with a single-flight guarantee, a structured inquiry
//! workflow routed to a dedicated agent, and management of the documents
//! backing a retrieval-augmented knowledge base.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use concierge::prelude::*;
//!
//! # async fn example() -> concierge::error::Result<()> {
//! let config = ConciergeConfig::load()?;
//! let client = Arc::new(HttpAgentClient::from_config(&config));
//! let mut session = ConversationSession::new(client, &config.chat_agent_id);
//! if let Some(reply) = session.send("What courses do you offer?").await {
//!     for block in concierge::render::render(reply.text()) {
//!         println!("{block}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
pub mod inquiry;
pub mod knowledge;
pub mod prelude;
pub mod render;
pub mod transport;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
