//! Remote agent invocation and reply normalization.

pub mod client;
pub mod extract;

pub use client::{
    AgentClient, AgentInvocationResult, FailureKind, HttpAgentClient, InvocationError,
};
pub use extract::{result_status, ExtractionStrategy, ResponseExtractor, NO_RESPONSE_TEXT};
