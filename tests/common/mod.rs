//! Shared test helpers: scripted agent client and in-memory knowledge store.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use concierge::agent::{AgentClient, AgentInvocationResult, InvocationError};
use concierge::error::ConciergeError;
use concierge::knowledge::{KnowledgeStore, RagDocument, UploadFile};

/// A mock agent client that replays queued results in order.
#[derive(Default)]
pub struct ScriptedClient {
    results: Mutex<VecDeque<AgentInvocationResult>>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self, result: AgentInvocationResult) -> &Self {
        self.results.lock().unwrap().push_back(result);
        self
    }

    pub fn queue_reply(&self, response: Value) -> &Self {
        self.queue(AgentInvocationResult::succeeded(Some(response)))
    }

    pub fn queue_rejection(&self, message: Option<&str>) -> &Self {
        self.queue(AgentInvocationResult::failed(InvocationError::semantic(
            message.map(str::to_string),
        )))
    }

    pub fn queue_network_failure(&self) -> &Self {
        self.queue(AgentInvocationResult::failed(InvocationError::transport(
            "connection refused",
        )))
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// `(prompt, agent_id)` of every call, in order.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentClient for ScriptedClient {
    async fn invoke(&self, prompt: &str, agent_id: &str) -> AgentInvocationResult {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), agent_id.to_string()));
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| AgentInvocationResult::succeeded(None))
    }
}

/// A knowledge store kept in memory, with switchable failures.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<Vec<RagDocument>>,
    fail_list: Mutex<Option<String>>,
    fail_mutation: Mutex<Option<Option<String>>>,
    list_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn with_documents(names: &[&str]) -> Self {
        let store = Self::default();
        *store.documents.lock().unwrap() = names.iter().map(|n| RagDocument::new(*n)).collect();
        store
    }

    /// Make every listing fail with the given server message.
    pub fn fail_listing(&self, message: &str) {
        *self.fail_list.lock().unwrap() = Some(message.to_string());
    }

    pub fn restore_listing(&self) {
        *self.fail_list.lock().unwrap() = None;
    }

    /// Make every upload and delete fail, optionally with a server message.
    pub fn fail_mutations(&self, message: Option<&str>) {
        *self.fail_mutation.lock().unwrap() = Some(message.map(str::to_string));
    }

    pub fn set_documents(&self, names: &[&str]) {
        *self.documents.lock().unwrap() = names.iter().map(|n| RagDocument::new(*n)).collect();
    }

    pub fn names(&self) -> Vec<String> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.file_name.clone())
            .collect()
    }

    pub fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn mutation_error(&self) -> Option<ConciergeError> {
        self.fail_mutation
            .lock()
            .unwrap()
            .clone()
            .map(ConciergeError::rejected)
    }
}

#[async_trait]
impl KnowledgeStore for MemoryStore {
    async fn list(&self, _knowledge_base_id: &str) -> Result<Vec<RagDocument>, ConciergeError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail_list.lock().unwrap().clone() {
            return Err(ConciergeError::rejected(Some(message)));
        }
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn upload(&self, _knowledge_base_id: &str, file: &UploadFile) -> Result<(), ConciergeError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.mutation_error() {
            return Err(err);
        }
        self.documents
            .lock()
            .unwrap()
            .push(RagDocument::new(file.file_name()));
        Ok(())
    }

    async fn delete(
        &self,
        _knowledge_base_id: &str,
        file_names: &[String],
    ) -> Result<(), ConciergeError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.mutation_error() {
            return Err(err);
        }
        self.documents
            .lock()
            .unwrap()
            .retain(|d| !file_names.contains(&d.file_name));
        Ok(())
    }
}
