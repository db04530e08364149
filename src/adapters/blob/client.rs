//! Blob Store HTTP Client - Vercel Blob REST API
//!
//! Wraps reqwest with bearer authentication and status checking for
//! the handful of blob store calls the storage adapter needs: put,
//! list (paginated), head, delete, and plain content fetches.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::debug;

use super::types::{BlobObject, DeleteBlobsRequest, ListBlobsPage, PutBlobResult};
use crate::config::StorageConfig;
use crate::ports::storage::StorageError;

/// Configuration for the blob store client.
#[derive(Debug, Clone)]
pub struct BlobClientConfig {
  /// REST API base URL.
  pub base_url: String,
  /// Read/write token sent as a bearer credential.
  pub token: Option<String>,
  /// Value of the `x-api-version` header.
  pub api_version: String,
  /// Request timeout.
  pub timeout: Duration,
}

impl Default for BlobClientConfig {
  fn default() -> Self {
    Self {
      base_url: "https://blob.vercel-storage.com".to_string(),
      token: None,
      api_version: "7".to_string(),
      timeout: Duration::from_secs(30),
    }
  }
}

impl BlobClientConfig {
  /// Build from the storage section of the app config.
  pub fn from_config(storage: &StorageConfig) -> Self {
    Self {
      base_url: storage.blob.base_url.clone(),
      token: storage.blob_token.clone(),
      api_version: storage.blob.api_version.clone(),
      timeout: Duration::from_secs(storage.blob.timeout_seconds),
    }
  }
}

/// HTTP client for the blob store.
#[derive(Debug, Clone)]
pub struct BlobClient {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: BlobClientConfig,
}

impl BlobClient {
  /// Create a new blob store client.
  pub fn new(config: BlobClientConfig) -> Result<Self, StorageError> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(5)
      .build()?;

    Ok(Self { http, config })
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn authed(&self, request: RequestBuilder) -> RequestBuilder {
    let request = request.header("x-api-version", &self.config.api_version);
    match &self.config.token {
      Some(token) => request.bearer_auth(token),
      None => request,
    }
  }

  /// Store `body` under `pathname` with public access.
  ///
  /// Existing objects are overwritten and no random suffix is added,
  /// so the pathname stays the durable key.
  pub async fn put(
    &self,
    pathname: &str,
    body: Vec<u8>,
    content_type: &str,
  ) -> Result<PutBlobResult, StorageError> {
    let request = self
      .authed(self.http.put(self.endpoint(pathname)))
      .header("x-content-type", content_type)
      .header("x-add-random-suffix", "0")
      .header("x-allow-overwrite", "1")
      .header("x-vercel-blob-access", "public")
      .body(body);

    let response = check(request.send().await?, "put").await?;
    Ok(response.json().await?)
  }

  /// Fetch one page of objects whose pathname starts with `prefix`.
  pub async fn list_page(
    &self,
    prefix: &str,
    cursor: Option<&str>,
    limit: Option<u32>,
  ) -> Result<ListBlobsPage, StorageError> {
    let mut query: Vec<(&str, String)> = vec![("prefix", prefix.to_string())];
    if let Some(cursor) = cursor {
      query.push(("cursor", cursor.to_string()));
    }
    if let Some(limit) = limit {
      query.push(("limit", limit.to_string()));
    }

    let request = self.authed(self.http.get(self.endpoint(""))).query(&query);
    let response = check(request.send().await?, "list").await?;
    Ok(response.json().await?)
  }

  /// List every object under `prefix`, following pagination cursors.
  pub async fn list_all(&self, prefix: &str) -> Result<Vec<BlobObject>, StorageError> {
    let mut blobs = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
      let page = self.list_page(prefix, cursor.as_deref(), None).await?;
      debug!(prefix, count = page.blobs.len(), has_more = page.has_more, "Listed blob page");
      blobs.extend(page.blobs);

      match page.cursor {
        Some(next) if page.has_more => cursor = Some(next),
        _ => break,
      }
    }

    Ok(blobs)
  }

  /// Metadata for a URL or pathname; `None` when the store has no such object.
  pub async fn head(&self, url_or_pathname: &str) -> Result<Option<BlobObject>, StorageError> {
    let request = self
      .authed(self.http.get(self.endpoint("")))
      .query(&[("url", url_or_pathname)]);
    let response = request.send().await?;

    if response.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let response = check(response, "head").await?;
    Ok(Some(response.json().await?))
  }

  /// Download the content at a public blob URL.
  pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, StorageError> {
    let response = check(self.http.get(url).send().await?, "fetch").await?;
    Ok(response.bytes().await?.to_vec())
  }

  /// Delete objects by URL or pathname.
  pub async fn delete(&self, urls: &[String]) -> Result<(), StorageError> {
    let request = self
      .authed(self.http.post(self.endpoint("delete")))
      .json(&DeleteBlobsRequest { urls });
    check(request.send().await?, "delete").await?;
    Ok(())
  }
}

/// Turn a non-success response into [`StorageError::RemoteStatus`].
async fn check(response: Response, operation: &'static str) -> Result<Response, StorageError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }
  let body = response.text().await.unwrap_or_default();
  Err(StorageError::RemoteStatus {
    operation,
    status: status.as_u16(),
    body,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_endpoint_joins_without_double_slash() {
    let client = BlobClient::new(BlobClientConfig {
      base_url: "http://localhost:9000/".to_string(),
      ..Default::default()
    })
    .unwrap();
    assert_eq!(client.endpoint("entries/a.json"), "http://localhost:9000/entries/a.json");
    assert_eq!(client.endpoint(""), "http://localhost:9000/");
  }
}
