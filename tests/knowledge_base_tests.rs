//! Knowledge base manager and HTTP store.

mod common;

use std::sync::Arc;

use common::MemoryStore;
use concierge::error::ConciergeError;
use concierge::knowledge::{
    HttpKnowledgeStore, KnowledgeBaseManager, KnowledgeStore, MutationResult, UploadFile,
    DELETE_FAILED_TEXT, UPLOAD_FAILED_TEXT,
};
use concierge::types::Status;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KB: &str = "kb-test";

fn upload_file(name: &str) -> UploadFile {
    UploadFile::new(name, b"Team handbook".to_vec()).expect("valid upload")
}

fn file_names(manager: &KnowledgeBaseManager) -> Vec<String> {
    manager
        .documents()
        .iter()
        .map(|d| d.file_name.clone())
        .collect()
}

#[tokio::test]
async fn upload_success_sets_status_and_refreshes_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rag"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains("name=\"rag_id\""))
        .and(body_string_contains(KB))
        .and(body_string_contains("filename=\"team.txt\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rag"))
        .and(query_param("rag_id", KB))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "documents": [{ "id": "d1", "file_name": "team.txt" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(HttpKnowledgeStore::new(server.uri()));
    let mut manager = KnowledgeBaseManager::new(store, KB);

    let result = manager.upload_and_train(&upload_file("team.txt")).await;

    assert_eq!(
        result,
        MutationResult {
            success: true,
            error: None
        }
    );
    assert_eq!(
        manager.status(),
        &Status::success("team.txt uploaded and trained successfully.")
    );
    assert_eq!(file_names(&manager), vec!["team.txt".to_string()]);
}

#[tokio::test]
async fn delete_sends_names_and_refreshes() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rag"))
        .and(body_json(json!({ "rag_id": KB, "document_names": ["old.pdf"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rag"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "documents": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(HttpKnowledgeStore::new(server.uri()));
    let mut manager = KnowledgeBaseManager::new(store, KB);

    let result = manager.delete("old.pdf").await;

    assert!(result.success);
    assert_eq!(manager.status(), &Status::success("old.pdf removed."));
    let snapshot = manager.snapshot().expect("refreshed after delete");
    assert!(snapshot.is_empty());
}

#[tokio::test]
async fn failed_listing_keeps_previous_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rag"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "documents": [{ "fileName": "a.pdf" }, { "name": "b.docx" }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rag"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "error": "store offline" })))
        .mount(&server)
        .await;

    let store = Arc::new(HttpKnowledgeStore::new(server.uri()));
    let mut manager = KnowledgeBaseManager::new(store, KB);

    manager.refresh().await.expect("first listing succeeds");
    let before = manager.snapshot().cloned();

    let err = manager.refresh().await.expect_err("second listing fails");
    assert_eq!(err.remote_message(), Some("store offline"));
    assert_eq!(manager.snapshot().cloned(), before);
    assert_eq!(
        file_names(&manager),
        vec!["a.pdf".to_string(), "b.docx".to_string()]
    );
}

#[tokio::test]
async fn listing_without_document_array_keeps_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rag"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "documents": [{ "fileName": "a.pdf" }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rag"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let store = Arc::new(HttpKnowledgeStore::new(server.uri()));
    let mut manager = KnowledgeBaseManager::new(store, KB);

    manager.refresh().await.expect("first listing succeeds");
    let err = manager.refresh().await.expect_err("listing without documents");

    assert!(matches!(err, ConciergeError::Serialization(_)));
    assert_eq!(file_names(&manager), vec!["a.pdf".to_string()]);
}

#[tokio::test]
async fn odd_records_do_not_hide_the_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rag"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "documents": [
                { "fileName": "a.pdf", "name": "a" },
                { "id": "d2" },
                { "file_name": "c.txt" }
            ]
        })))
        .mount(&server)
        .await;

    let store = HttpKnowledgeStore::new(server.uri());
    let documents = store.list(KB).await.expect("listing succeeds");

    let names: Vec<&str> = documents.iter().map(|d| d.file_name.as_str()).collect();
    assert_eq!(names, vec!["a.pdf", "c.txt"]);
    assert_eq!(documents[0].metadata.get("name"), Some(&json!("a")));
}

#[tokio::test]
async fn empty_listing_replaces_snapshot() {
    let store = Arc::new(MemoryStore::with_documents(&["a.pdf"]));
    let mut manager = KnowledgeBaseManager::new(store.clone(), KB);

    manager.refresh().await.unwrap();
    assert_eq!(manager.documents().len(), 1);

    store.set_documents(&[]);
    let snapshot = manager.refresh().await.unwrap();
    assert!(snapshot.is_empty());
    assert!(manager.snapshot().is_some());
}

#[tokio::test]
async fn never_listed_is_distinct_from_empty() {
    let store = Arc::new(MemoryStore::default());
    store.fail_listing("denied");
    let mut manager = KnowledgeBaseManager::new(store, KB);

    assert!(manager.refresh().await.is_err());
    assert!(manager.snapshot().is_none());
    assert!(manager.documents().is_empty());
}

#[tokio::test]
async fn upload_failure_reports_server_message_or_fallback() {
    let store = Arc::new(MemoryStore::with_documents(&["a.pdf"]));
    let mut manager = KnowledgeBaseManager::new(store.clone(), KB);
    manager.refresh().await.unwrap();

    store.fail_mutations(Some("File too large"));
    let result = manager.upload_and_train(&upload_file("big.pdf")).await;
    assert_eq!(result.error.as_deref(), Some("File too large"));
    assert_eq!(manager.status(), &Status::error("File too large"));

    store.fail_mutations(None);
    let result = manager.upload_and_train(&upload_file("big.pdf")).await;
    assert!(!result.success);
    assert_eq!(manager.status(), &Status::error(UPLOAD_FAILED_TEXT));

    // No refresh after a failed mutation.
    assert_eq!(store.lists(), 1);
    assert_eq!(file_names(&manager), vec!["a.pdf".to_string()]);
}

#[tokio::test]
async fn delete_failure_reports_fallback_and_skips_refresh() {
    let store = Arc::new(MemoryStore::with_documents(&["a.pdf"]));
    store.fail_mutations(None);
    let mut manager = KnowledgeBaseManager::new(store.clone(), KB);

    let result = manager.delete("a.pdf").await;

    assert_eq!(result.error.as_deref(), Some(DELETE_FAILED_TEXT));
    assert_eq!(manager.status(), &Status::error(DELETE_FAILED_TEXT));
    assert_eq!(store.deletes(), 1);
    assert_eq!(store.lists(), 0);
}

#[tokio::test]
async fn successful_mutations_refresh_exactly_once_each() {
    let store = Arc::new(MemoryStore::default());
    let mut manager = KnowledgeBaseManager::new(store.clone(), KB);

    manager.upload_and_train(&upload_file("guide.docx")).await;
    assert_eq!(store.lists(), 1);
    assert_eq!(file_names(&manager), vec!["guide.docx".to_string()]);

    manager.delete("guide.docx").await;
    assert_eq!(store.lists(), 2);
    assert!(file_names(&manager).is_empty());
    assert_eq!(store.uploads(), 1);
}

#[tokio::test]
async fn dismiss_clears_success_status() {
    let store = Arc::new(MemoryStore::default());
    let mut manager = KnowledgeBaseManager::new(store.clone(), KB);

    manager.delete("missing.pdf").await;
    assert!(manager.status().is_success());

    manager.dismiss_status();
    assert!(manager.status().is_none());
}

#[tokio::test]
async fn store_rejects_listing_with_success_false() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rag"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "unknown knowledge base"
        })))
        .mount(&server)
        .await;

    let store = HttpKnowledgeStore::new(server.uri());
    let err = store.list(KB).await.unwrap_err();

    assert!(matches!(err, ConciergeError::Rejected { .. }));
    assert_eq!(err.remote_message(), Some("unknown knowledge base"));
}
