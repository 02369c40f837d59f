//! Document lifecycle for the retrieval-augmented knowledge base.

pub mod document;
pub mod manager;
pub mod store;

pub use document::{DocumentKind, RagDocument, UploadFile};
pub use manager::{
    KnowledgeBaseManager, KnowledgeBaseSnapshot, MutationResult, DELETE_FAILED_TEXT,
    UPLOAD_FAILED_TEXT,
};
pub use store::{HttpKnowledgeStore, KnowledgeStore};
