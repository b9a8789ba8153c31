//! Integration tests: DriveStorage against a mock Drive API
//!
//! Verifies listing pagination, folder/file filtering at the query level,
//! multipart upload, and error mapping.

use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tillsync_core::domain::{FetchError, FolderId, UploadError};
use tillsync_core::ports::StorageIndex;
use tillsync_drive::{DriveClient, DriveStorage};

fn storage(server: &MockServer) -> DriveStorage {
    DriveStorage::new(DriveClient::with_base_urls(
        "test-token",
        server.uri(),
        server.uri(),
    ))
}

fn folder_id(id: &str) -> FolderId {
    FolderId::new(id).unwrap()
}

#[tokio::test]
async fn test_list_folders_maps_entries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [
                {"id": "f-alice", "name": "Alice", "mimeType": "application/vnd.google-apps.folder"},
                {"id": "f-bob", "name": "Bob", "mimeType": "application/vnd.google-apps.folder"},
            ]
        })))
        .mount(&server)
        .await;

    let folders = storage(&server)
        .list_folders(&folder_id("root"))
        .await
        .unwrap();

    assert_eq!(folders.len(), 2);
    assert_eq!(folders[0].name, "Alice");
    assert_eq!(folders[0].id.as_str(), "f-alice");
    assert_eq!(folders[1].name, "Bob");
}

#[tokio::test]
async fn test_list_files_follows_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nextPageToken": "page-2",
            "files": [
                {"id": "x1", "name": "2024-01-01-alice.pdf", "mimeType": "application/pdf"},
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [
                {"id": "x2", "name": "2024-01-02-alice.pdf", "mimeType": "application/pdf"},
            ]
        })))
        .mount(&server)
        .await;

    let files = storage(&server)
        .list_files(&folder_id("f-alice"))
        .await
        .unwrap();

    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["2024-01-01-alice.pdf", "2024-01-02-alice.pdf"]);
}

#[tokio::test]
async fn test_list_queries_scope_to_parent() {
    let server = MockServer::start().await;

    // The q filter must pin the parent folder; anything else would leak
    // files across users and break folder-scoped satisfaction.
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param(
            "q",
            "'f-alice' in parents and trashed = false and mimeType != 'application/vnd.google-apps.folder'",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": []})))
        .expect(1)
        .mount(&server)
        .await;

    let files = storage(&server)
        .list_files(&folder_id("f-alice"))
        .await
        .unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_list_error_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(403).set_body_string("insufficient permissions"))
        .mount(&server)
        .await;

    let err = storage(&server)
        .list_files(&folder_id("f-alice"))
        .await
        .unwrap_err();

    match err {
        FetchError::Api { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("insufficient permissions"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_returns_ack() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .and(query_param("uploadType", "multipart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "new-file-1",
            "name": "2024-01-02-alice.pdf",
            "mimeType": "application/pdf",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = storage(&server)
        .upload(&folder_id("f-alice"), "2024-01-02-alice.pdf", b"%PDF-1.4")
        .await
        .unwrap();

    assert_eq!(ack.file_id.as_str(), "new-file-1");
    assert_eq!(ack.name, "2024-01-02-alice.pdf");
}

#[tokio::test]
async fn test_upload_failure_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(507).set_body_string("storage quota exceeded"))
        .mount(&server)
        .await;

    let err = storage(&server)
        .upload(&folder_id("f-alice"), "2024-01-02-alice.pdf", b"%PDF-1.4")
        .await
        .unwrap_err();

    match err {
        UploadError::Api { status, message } => {
            assert_eq!(status, 507);
            assert!(message.contains("quota"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
