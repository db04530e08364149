//! Blob store REST API wire types.

use serde::{Deserialize, Serialize};

/// Metadata for one stored object, as returned by list and head.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobObject {
    /// Public URL of the object.
    pub url: String,
    /// Store key.
    pub pathname: String,
    /// Payload size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Upload timestamp (RFC 3339).
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// One page of a prefix listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBlobsPage {
    pub blobs: Vec<BlobObject>,
    /// Opaque cursor for the next page.
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Response to a successful put.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutBlobResult {
    pub url: String,
    pub pathname: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Body of a delete request.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteBlobsRequest<'a> {
    /// URLs or pathnames to remove.
    pub urls: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_page_parses_without_optional_fields() {
        let page: ListBlobsPage = serde_json::from_str(
            r#"{"blobs":[{"url":"https://x.public.blob.vercel-storage.com/entries/2026-01-29.json","pathname":"entries/2026-01-29.json"}],"hasMore":false}"#,
        )
        .unwrap();
        assert_eq!(page.blobs.len(), 1);
        assert_eq!(page.blobs[0].pathname, "entries/2026-01-29.json");
        assert!(page.cursor.is_none());
        assert!(!page.has_more);
    }

    #[test]
    fn test_delete_request_shape() {
        let urls = vec!["https://x/a.jpg".to_string()];
        let json = serde_json::to_value(DeleteBlobsRequest { urls: &urls }).unwrap();
        assert_eq!(json, serde_json::json!({ "urls": ["https://x/a.jpg"] }));
    }
}
