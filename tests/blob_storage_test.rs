//! Blob Storage Tests - Remote Adapter Against a Mock Blob Store
//!
//! Uses httpmock to stand in for the blob REST API and checks the
//! requests the adapter issues and how it reads the responses.

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use scrapbook::adapters::blob::{BlobClient, BlobClientConfig};
use scrapbook::adapters::storage::BlobStorageAdapter;
use scrapbook::domain::entry::{Photo, ScrapbookEntry};
use scrapbook::ports::storage::{StorageAdapter, StorageBackend, StorageError};

fn adapter(server: &MockServer) -> BlobStorageAdapter {
    let client = BlobClient::new(BlobClientConfig {
        base_url: server.base_url(),
        token: Some("test-token".to_string()),
        api_version: "7".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    BlobStorageAdapter::new(client)
}

fn entry(date: &str, photo_urls: &[String]) -> ScrapbookEntry {
    ScrapbookEntry {
        id: format!("id-{date}"),
        date: date.to_string(),
        title: format!("Day {date}"),
        description: String::new(),
        photos: photo_urls
            .iter()
            .enumerate()
            .map(|(i, url)| Photo {
                id: format!("p{i}"),
                url: url.clone(),
                caption: Some("caption".to_string()),
                width: 800,
                height: 600,
            })
            .collect(),
        created_at: "2026-01-29T12:00:00Z".to_string(),
        updated_at: "2026-01-29T12:00:00Z".to_string(),
    }
}

fn blob(server: &MockServer, date: &str) -> serde_json::Value {
    json!({
        "url": server.url(format!("/files/entries/{date}.json")),
        "pathname": format!("entries/{date}.json"),
        "size": 120,
        "uploadedAt": "2026-01-29T12:00:00Z"
    })
}

#[tokio::test]
async fn test_backend_is_vercel() {
    let server = MockServer::start_async().await;
    assert_eq!(adapter(&server).backend(), StorageBackend::Vercel);
}

#[tokio::test]
async fn test_create_puts_json_under_entries_prefix() {
    let server = MockServer::start_async().await;
    let put = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/entries/2026-01-29.json")
                .header("authorization", "Bearer test-token")
                .header("x-content-type", "application/json")
                .header("x-add-random-suffix", "0")
                .header("x-allow-overwrite", "1")
                .body_contains("\"createdAt\"");
            then.status(200).json_body(json!({
                "url": server.url("/files/entries/2026-01-29.json"),
                "pathname": "entries/2026-01-29.json"
            }));
        })
        .await;

    adapter(&server)
        .create_entry(&entry("2026-01-29", &[]))
        .await
        .unwrap();

    put.assert_async().await;
}

#[tokio::test]
async fn test_create_propagates_remote_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/entries/2026-01-29.json");
            then.status(403).body("forbidden");
        })
        .await;

    let result = adapter(&server).create_entry(&entry("2026-01-29", &[])).await;
    assert!(matches!(
        result,
        Err(StorageError::RemoteStatus { status: 403, .. })
    ));
}

#[tokio::test]
async fn test_get_looks_up_pathname_then_fetches_content() {
    let server = MockServer::start_async().await;
    let stored = entry("2026-01-29", &["https://cdn.example.com/a.jpg".to_string()]);

    let head = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/")
                .query_param("url", "entries/2026-01-29.json");
            then.status(200).json_body(blob(&server, "2026-01-29"));
        })
        .await;
    let content = server
        .mock_async(|when, then| {
            when.method(GET).path("/files/entries/2026-01-29.json");
            then.status(200).json_body(serde_json::to_value(&stored).unwrap());
        })
        .await;

    let found = adapter(&server).get_entry("2026-01-29").await;

    assert_eq!(found, Some(stored));
    head.assert_async().await;
    content.assert_async().await;
}

#[tokio::test]
async fn test_get_missing_entry_is_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/").query_param("url", "entries/2026-01-29.json");
            then.status(404).json_body(json!({ "error": { "code": "not_found" } }));
        })
        .await;

    assert!(adapter(&server).get_entry("2026-01-29").await.is_none());
}

#[tokio::test]
async fn test_get_on_server_error_is_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(500);
        })
        .await;

    assert!(adapter(&server).get_entry("2026-01-29").await.is_none());
}

#[tokio::test]
async fn test_list_follows_cursor_and_sorts_newest_first() {
    let server = MockServer::start_async().await;
    let older = entry("2025-06-01", &[]);
    let newer = entry("2026-01-29", &[]);

    // Registered first so the cursor request prefers it.
    let page_two = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/")
                .query_param("prefix", "entries/")
                .query_param("cursor", "next-page");
            then.status(200).json_body(json!({
                "blobs": [blob(&server, "2026-01-29")],
                "hasMore": false
            }));
        })
        .await;
    let page_one = server
        .mock_async(|when, then| {
            when.method(GET).path("/").query_param("prefix", "entries/");
            then.status(200).json_body(json!({
                "blobs": [blob(&server, "2025-06-01")],
                "cursor": "next-page",
                "hasMore": true
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/files/entries/2025-06-01.json");
            then.status(200).json_body(serde_json::to_value(&older).unwrap());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/files/entries/2026-01-29.json");
            then.status(200).json_body(serde_json::to_value(&newer).unwrap());
        })
        .await;

    let entries = adapter(&server).list_entries().await;

    assert_eq!(entries, vec![newer, older]);
    page_one.assert_async().await;
    page_two.assert_async().await;
}

#[tokio::test]
async fn test_list_skips_unreadable_documents() {
    let server = MockServer::start_async().await;
    let good = entry("2026-01-29", &[]);

    server
        .mock_async(|when, then| {
            when.method(GET).path("/").query_param("prefix", "entries/");
            then.status(200).json_body(json!({
                "blobs": [blob(&server, "2026-01-29"), blob(&server, "2026-01-30")],
                "hasMore": false
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/files/entries/2026-01-29.json");
            then.status(200).json_body(serde_json::to_value(&good).unwrap());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/files/entries/2026-01-30.json");
            then.status(200).body("not json");
        })
        .await;

    assert_eq!(adapter(&server).list_entries().await, vec![good]);
}

#[tokio::test]
async fn test_list_failure_yields_empty() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(503).body("unavailable");
        })
        .await;

    assert!(adapter(&server).list_entries().await.is_empty());
}

#[tokio::test]
async fn test_upload_returns_store_url() {
    let server = MockServer::start_async().await;
    let put = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/abc.jpg")
                .header("x-content-type", "image/jpeg")
                .body("jpeg bytes");
            then.status(200).json_body(json!({
                "url": "https://store.public.blob.example.com/abc.jpg",
                "pathname": "abc.jpg",
                "contentType": "image/jpeg"
            }));
        })
        .await;

    let url = adapter(&server)
        .upload_photo(b"jpeg bytes".to_vec(), "abc.jpg", "image/jpeg")
        .await
        .unwrap();

    assert_eq!(url, "https://store.public.blob.example.com/abc.jpg");
    put.assert_async().await;
}

#[tokio::test]
async fn test_delete_photo_posts_url() {
    let server = MockServer::start_async().await;
    let delete = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/delete")
                .header("authorization", "Bearer test-token")
                .json_body(json!({ "urls": ["https://cdn.example.com/a.jpg"] }));
            then.status(200).json_body(json!({}));
        })
        .await;

    adapter(&server)
        .delete_photo("https://cdn.example.com/a.jpg")
        .await
        .unwrap();
    delete.assert_async().await;
}

#[tokio::test]
async fn test_delete_entry_cascades_and_removes_record() {
    let server = MockServer::start_async().await;
    let photos = vec![
        "https://cdn.example.com/a.jpg".to_string(),
        "https://cdn.example.com/b.jpg".to_string(),
    ];
    let stored = entry("2026-01-29", &photos);

    server
        .mock_async(|when, then| {
            when.method(GET).path("/").query_param("url", "entries/2026-01-29.json");
            then.status(200).json_body(blob(&server, "2026-01-29"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/files/entries/2026-01-29.json");
            then.status(200).json_body(serde_json::to_value(&stored).unwrap());
        })
        .await;
    let delete_a = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/delete")
                .json_body(json!({ "urls": ["https://cdn.example.com/a.jpg"] }));
            then.status(500).body("boom");
        })
        .await;
    let delete_b = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/delete")
                .json_body(json!({ "urls": ["https://cdn.example.com/b.jpg"] }));
            then.status(200).json_body(json!({}));
        })
        .await;
    let delete_record = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/delete")
                .json_body(json!({ "urls": ["entries/2026-01-29.json"] }));
            then.status(200).json_body(json!({}));
        })
        .await;

    adapter(&server).delete_entry("2026-01-29").await.unwrap();

    delete_a.assert_async().await;
    delete_b.assert_async().await;
    delete_record.assert_async().await;
}

#[tokio::test]
async fn test_delete_entry_record_failure_propagates() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/").query_param("url", "entries/2026-01-29.json");
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/delete");
            then.status(500).body("boom");
        })
        .await;

    let result = adapter(&server).delete_entry("2026-01-29").await;
    assert!(matches!(
        result,
        Err(StorageError::RemoteStatus { operation: "delete", status: 500, .. })
    ));
}

#[tokio::test]
async fn test_health_probe_reflects_store_availability() {
    let server = MockServer::start_async().await;
    let mut probe = server
        .mock_async(|when, then| {
            when.method(GET).path("/").query_param("limit", "1");
            then.status(200).json_body(json!({ "blobs": [], "hasMore": false }));
        })
        .await;
    assert!(adapter(&server).is_healthy().await);

    probe.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(401);
        })
        .await;
    assert!(!adapter(&server).is_healthy().await);
}
