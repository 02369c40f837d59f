//! Agent invocation over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ConciergeConfig;
use crate::error::{ConciergeError, ErrorCategory};
use crate::transport::{auth_headers, endpoint, read_json, shared_client};
use crate::util::timeout::with_timeout;

const AGENT_PATH: &str = "agent";

/// Whether a failed invocation ever reached the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The call could not complete (connect, I/O, timeout).
    Transport,
    /// The call completed but the reply signals failure or is malformed.
    Semantic,
}

/// Why an invocation did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationError {
    pub kind: FailureKind,
    /// Message from the remote service or transport, if any.
    pub message: Option<String>,
}

impl InvocationError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: Some(message.into()),
        }
    }

    pub fn semantic(message: Option<String>) -> Self {
        Self {
            kind: FailureKind::Semantic,
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind == FailureKind::Transport
    }
}

impl From<&ConciergeError> for InvocationError {
    fn from(err: &ConciergeError) -> Self {
        match err {
            e if e.category() == ErrorCategory::Transport => Self::transport(e.to_string()),
            // Only text the remote service wrote itself is shown to users.
            e => Self::semantic(e.remote_message().map(str::to_string)),
        }
    }
}

/// Outcome of exactly one agent call. Never mutated after it is returned.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentInvocationResult {
    pub success: bool,
    pub raw_response: Option<Value>,
    pub error: Option<InvocationError>,
}

impl AgentInvocationResult {
    pub fn succeeded(raw_response: Option<Value>) -> Self {
        Self {
            success: true,
            raw_response,
            error: None,
        }
    }

    pub fn failed(error: InvocationError) -> Self {
        Self {
            success: false,
            raw_response: None,
            error: Some(error),
        }
    }

    /// Error text carried by a failed result.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.message.as_deref())
    }

    /// True when the failure happened before the agent could answer.
    pub fn is_transport_failure(&self) -> bool {
        self.error.as_ref().is_some_and(InvocationError::is_transport)
    }
}

/// Sends a prompt to a remote agent.
///
/// Implementations capture every failure in the returned result; they never
/// return an error or panic.
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn invoke(&self, prompt: &str, agent_id: &str) -> AgentInvocationResult;
}

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    message: &'a str,
    agent_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct InvokeEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    response: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// [`AgentClient`] backed by the `POST {base_url}/agent` endpoint.
#[derive(Debug, Clone)]
pub struct HttpAgentClient {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpAgentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: crate::config::DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(config: &ConciergeConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn invoke_once(&self, prompt: &str, agent_id: &str) -> Result<Option<Value>, ConciergeError> {
        let url = endpoint(&self.base_url, AGENT_PATH);
        let body = InvokeRequest {
            message: prompt,
            agent_id,
        };

        let envelope: InvokeEnvelope = with_timeout(self.timeout, async {
            let response = shared_client()
                .post(url)
                .headers(auth_headers(self.api_key.as_deref()))
                .json(&body)
                .send()
                .await?;
            read_json(response).await
        })
        .await?;

        if !envelope.success {
            return Err(ConciergeError::rejected(envelope.error));
        }
        Ok(envelope.response)
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn invoke(&self, prompt: &str, agent_id: &str) -> AgentInvocationResult {
        tracing::debug!(agent_id, prompt_len = prompt.len(), "invoking agent");
        match self.invoke_once(prompt, agent_id).await {
            Ok(response) => AgentInvocationResult::succeeded(response),
            Err(err) => {
                tracing::warn!(agent_id, error = %err, "agent invocation failed");
                AgentInvocationResult::failed(InvocationError::from(&err))
            }
        }
    }
}
