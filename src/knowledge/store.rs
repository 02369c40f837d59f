//! Remote knowledge store transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use super::document::{RagDocument, UploadFile};
use crate::config::ConciergeConfig;
use crate::error::ConciergeError;
use crate::transport::multipart::MultipartBody;
use crate::transport::{auth_headers, endpoint, read_json, shared_client};
use crate::util::timeout::with_timeout;

const RAG_PATH: &str = "rag";

/// Document operations against a store scoped by knowledge base id.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Full document listing. `Ok(vec![])` means the base is empty; a reply
    /// without a document array is an error.
    async fn list(&self, knowledge_base_id: &str) -> Result<Vec<RagDocument>, ConciergeError>;

    /// Submit a document for ingestion and training.
    async fn upload(&self, knowledge_base_id: &str, file: &UploadFile) -> Result<(), ConciergeError>;

    /// Remove documents by file name.
    async fn delete(
        &self,
        knowledge_base_id: &str,
        file_names: &[String],
    ) -> Result<(), ConciergeError>;
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    documents: Option<Vec<RagDocument>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MutationEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    rag_id: &'a str,
    document_names: &'a [String],
}

/// [`KnowledgeStore`] backed by the `{base_url}/rag` endpoints.
#[derive(Debug, Clone)]
pub struct HttpKnowledgeStore {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpKnowledgeStore {
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

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self) -> String {
        endpoint(&self.base_url, RAG_PATH)
    }
}

fn check_mutation(envelope: MutationEnvelope) -> Result<(), ConciergeError> {
    if envelope.success {
        Ok(())
    } else {
        Err(ConciergeError::rejected(envelope.error))
    }
}

#[async_trait]
impl KnowledgeStore for HttpKnowledgeStore {
    async fn list(&self, knowledge_base_id: &str) -> Result<Vec<RagDocument>, ConciergeError> {
        let envelope: ListEnvelope = with_timeout(self.timeout, async {
            let response = shared_client()
                .get(self.url())
                .headers(auth_headers(self.api_key.as_deref()))
                .query(&[("rag_id", knowledge_base_id)])
                .send()
                .await?;
            read_json(response).await
        })
        .await?;

        if !envelope.success {
            return Err(ConciergeError::rejected(envelope.error));
        }
        // A listing without the array is malformed, not empty.
        let documents = envelope.documents.ok_or_else(|| {
            ConciergeError::Serialization(serde::de::Error::missing_field("documents"))
        })?;

        let total = documents.len();
        let documents: Vec<RagDocument> = documents
            .into_iter()
            .filter(|doc| !doc.file_name.trim().is_empty())
            .collect();
        if documents.len() < total {
            tracing::debug!(
                knowledge_base_id,
                skipped = total - documents.len(),
                "skipping documents without a file name"
            );
        }
        Ok(documents)
    }

    async fn upload(&self, knowledge_base_id: &str, file: &UploadFile) -> Result<(), ConciergeError> {
        let form = MultipartBody::new()
            .text("rag_id", knowledge_base_id)
            .file("file", file.file_name(), file.kind().mime_type(), file.bytes());

        let mut headers = auth_headers(self.api_key.as_deref());
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&form.content_type()).map_err(|e| {
                ConciergeError::InvalidArgument(format!("Failed to build multipart content-type: {e}"))
            })?,
        );

        let envelope: MutationEnvelope = with_timeout(self.timeout, async {
            let response = shared_client()
                .post(self.url())
                .headers(headers)
                .body(form.finish())
                .send()
                .await?;
            read_json(response).await
        })
        .await?;

        check_mutation(envelope)
    }

    async fn delete(
        &self,
        knowledge_base_id: &str,
        file_names: &[String],
    ) -> Result<(), ConciergeError> {
        let body = DeleteRequest {
            rag_id: knowledge_base_id,
            document_names: file_names,
        };

        let envelope: MutationEnvelope = with_timeout(self.timeout, async {
            let response = shared_client()
                .delete(self.url())
                .headers(auth_headers(self.api_key.as_deref()))
                .json(&body)
                .send()
                .await?;
            read_json(response).await
        })
        .await?;

        check_mutation(envelope)
    }
}
