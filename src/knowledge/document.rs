//! Knowledge base documents and upload payloads.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use crate::error::ConciergeError;

/// Keys that may carry a document's file name, in order of preference.
const FILE_NAME_KEYS: [&str; 3] = ["fileName", "file_name", "name"];

/// A document held by the remote store.
///
/// Opaque apart from `file_name`, which is the deletion key. Any other
/// server-provided fields are kept in `metadata`. Deserialization never
/// fails on an unexpected shape: a record without a usable name comes back
/// with an empty `file_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct RagDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub file_name: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl RagDocument {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            id: None,
            file_name: file_name.into(),
            metadata: Map::new(),
        }
    }
}

impl From<Map<String, Value>> for RagDocument {
    fn from(mut fields: Map<String, Value>) -> Self {
        let id = fields.remove("id").and_then(opaque_id);
        let name_key = FILE_NAME_KEYS.iter().find(|key| {
            fields
                .get(**key)
                .and_then(Value::as_str)
                .is_some_and(|name| !name.trim().is_empty())
        });
        let file_name = match name_key {
            Some(key) => match fields.remove(*key) {
                Some(Value::String(name)) => name,
                _ => String::new(),
            },
            None => String::new(),
        };
        Self {
            id,
            file_name,
            metadata: fields,
        }
    }
}

/// Accept string or numeric identifiers.
fn opaque_id(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Document types accepted for ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [Self::Pdf, Self::Docx, Self::Txt];

    /// Kind from a file name's extension, if allowed.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        ext.parse().ok()
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Txt => "text/plain",
        }
    }
}

/// A document ready to upload. Only allow-listed kinds can be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    file_name: String,
    kind: DocumentKind,
    bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ConciergeError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(ConciergeError::InvalidArgument(
                "File name cannot be empty".to_string(),
            ));
        }
        let kind = DocumentKind::from_file_name(&file_name).ok_or_else(|| {
            ConciergeError::InvalidArgument(format!(
                "Unsupported document type: {file_name} (expected .pdf, .docx, or .txt)"
            ))
        })?;
        if bytes.is_empty() {
            return Err(ConciergeError::InvalidArgument(format!(
                "Document is empty: {file_name}"
            )));
        }
        Ok(Self {
            file_name,
            kind,
            bytes,
        })
    }

    /// Read a document from disk.
    pub async fn from_path(path: &Path) -> Result<Self, ConciergeError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ConciergeError::InvalidArgument(format!("Invalid file path: {}", path.display()))
            })?
            .to_string();
        // Reject by name before reading anything.
        DocumentKind::from_file_name(&file_name).ok_or_else(|| {
            ConciergeError::InvalidArgument(format!("Unsupported document type: {file_name}"))
        })?;
        let bytes = tokio::fs::read(path).await?;
        Self::new(file_name, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
