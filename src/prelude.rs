//! Convenience re-exports for common use.

pub use crate::agent::{AgentClient, AgentInvocationResult, HttpAgentClient, ResponseExtractor};
pub use crate::chat::{ConversationSession, SessionState};
pub use crate::config::ConciergeConfig;
pub use crate::error::{ConciergeError, ErrorCategory, Result};
pub use crate::inquiry::{InquiryForm, InquiryWorkflow, InterestType, SubmitOutcome, TeamContact};
pub use crate::knowledge::{
    HttpKnowledgeStore, KnowledgeBaseManager, KnowledgeStore, RagDocument, UploadFile,
};
pub use crate::render::{render, Block, Inline};
pub use crate::types::{Message, Role, Status, StatusKind};
