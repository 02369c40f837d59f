//! Knowledge base snapshot and document lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::document::{RagDocument, UploadFile};
use super::store::KnowledgeStore;
use crate::error::ConciergeError;
use crate::types::Status;

pub const UPLOAD_FAILED_TEXT: &str = "Upload failed. Please try again.";
pub const DELETE_FAILED_TEXT: &str = "Delete failed.";

/// A complete listing as returned by one successful read.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeBaseSnapshot {
    pub documents: Vec<RagDocument>,
    pub fetched_at: DateTime<Utc>,
}

impl KnowledgeBaseSnapshot {
    pub fn contains(&self, file_name: &str) -> bool {
        self.documents.iter().any(|d| d.file_name == file_name)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Outcome of an upload or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationResult {
    pub success: bool,
    pub error: Option<String>,
}

impl MutationResult {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Manages the documents of a single knowledge base.
///
/// The held snapshot is only ever replaced by a full successful listing; a
/// failed listing leaves it as it was. Upload and delete each perform one
/// round trip followed by exactly one refresh on success. All operations
/// take `&mut self`, so they never overlap on one manager.
pub struct KnowledgeBaseManager {
    store: Arc<dyn KnowledgeStore>,
    knowledge_base_id: String,
    snapshot: Option<KnowledgeBaseSnapshot>,
    status: Status,
}

impl std::fmt::Debug for KnowledgeBaseManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBaseManager")
            .field("knowledge_base_id", &self.knowledge_base_id)
            .field("snapshot", &self.snapshot)
            .field("status", &self.status)
            .finish()
    }
}

impl KnowledgeBaseManager {
    pub fn new(store: Arc<dyn KnowledgeStore>, knowledge_base_id: impl Into<String>) -> Self {
        Self {
            store,
            knowledge_base_id: knowledge_base_id.into(),
            snapshot: None,
            status: Status::none(),
        }
    }

    pub fn knowledge_base_id(&self) -> &str {
        &self.knowledge_base_id
    }

    /// Last successful listing; `None` if no listing has succeeded yet.
    pub fn snapshot(&self) -> Option<&KnowledgeBaseSnapshot> {
        self.snapshot.as_ref()
    }

    /// Documents of the last successful listing (empty if none).
    pub fn documents(&self) -> &[RagDocument] {
        self.snapshot
            .as_ref()
            .map(|s| s.documents.as_slice())
            .unwrap_or_default()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn dismiss_status(&mut self) {
        self.status.clear();
    }

    /// Fetch the full listing and replace the snapshot.
    ///
    /// On failure the previous snapshot is kept and the error returned.
    pub async fn refresh(&mut self) -> Result<&KnowledgeBaseSnapshot, ConciergeError> {
        match self.store.list(&self.knowledge_base_id).await {
            Ok(documents) => {
                tracing::debug!(
                    knowledge_base_id = %self.knowledge_base_id,
                    count = documents.len(),
                    "knowledge base listed"
                );
                Ok(&*self.snapshot.insert(KnowledgeBaseSnapshot {
                    documents,
                    fetched_at: Utc::now(),
                }))
            }
            Err(err) => {
                tracing::warn!(
                    knowledge_base_id = %self.knowledge_base_id,
                    error = %err,
                    "knowledge base listing failed; keeping previous snapshot"
                );
                Err(err)
            }
        }
    }

    /// Upload a document for ingestion, then refresh on success.
    pub async fn upload_and_train(&mut self, file: &UploadFile) -> MutationResult {
        self.status.clear();
        match self.store.upload(&self.knowledge_base_id, file).await {
            Ok(()) => {
                tracing::info!(file = file.file_name(), "document uploaded and trained");
                self.status = Status::success(format!(
                    "{} uploaded and trained successfully.",
                    file.file_name()
                ));
                self.refresh_after_mutation().await;
                MutationResult::ok()
            }
            Err(err) => {
                tracing::warn!(file = file.file_name(), error = %err, "document upload failed");
                let message = err.user_message(UPLOAD_FAILED_TEXT).into_inner();
                self.status = Status::error(message.clone());
                MutationResult::failed(message)
            }
        }
    }

    /// Delete a document by file name, then refresh on success.
    pub async fn delete(&mut self, file_name: &str) -> MutationResult {
        self.status.clear();
        let names = [file_name.to_string()];
        match self.store.delete(&self.knowledge_base_id, &names).await {
            Ok(()) => {
                tracing::info!(file = file_name, "document removed");
                self.status = Status::success(format!("{file_name} removed."));
                self.refresh_after_mutation().await;
                MutationResult::ok()
            }
            Err(err) => {
                tracing::warn!(file = file_name, error = %err, "document delete failed");
                let message = err.user_message(DELETE_FAILED_TEXT).into_inner();
                self.status = Status::error(message.clone());
                MutationResult::failed(message)
            }
        }
    }

    async fn refresh_after_mutation(&mut self) {
        // The mutation already succeeded; a failed refresh only leaves the old snapshot.
        let _ = self.refresh().await;
    }
}
