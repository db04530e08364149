//! Blob Storage Adapter - Entries and Photos in the Remote Object Store
//!
//! Entries are JSON documents under the `entries/` prefix, keyed by
//! date. Photos are stored at top level under their generated
//! filename; the public URL the store returns is their durable
//! address, so photo deletes go by URL.

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{error, info, instrument, warn};

use crate::adapters::blob::{BlobClient, BlobObject};
use crate::domain::entry::{self, ScrapbookEntry};
use crate::ports::storage::{StorageAdapter, StorageBackend, StorageError};

/// Pathname prefix for entry documents.
pub const ENTRY_PREFIX: &str = "entries/";

/// Blob-store-backed storage adapter.
#[derive(Debug, Clone)]
pub struct BlobStorageAdapter {
    client: BlobClient,
}

impl BlobStorageAdapter {
    pub fn new(client: BlobClient) -> Self {
        Self { client }
    }

    /// Store pathname of the entry for `date`.
    pub fn entry_pathname(date: &str) -> String {
        format!("{ENTRY_PREFIX}{}", entry::entry_file_name(date))
    }

    fn checked_pathname(date: &str) -> Result<String, StorageError> {
        if entry::is_safe_key(date) {
            Ok(Self::entry_pathname(date))
        } else {
            Err(StorageError::InvalidKey(date.to_string()))
        }
    }

    async fn fetch_entry(&self, blob: &BlobObject) -> Result<ScrapbookEntry, StorageError> {
        let bytes = self.client.fetch(&blob.url).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn try_list(&self) -> Result<Vec<ScrapbookEntry>, StorageError> {
        let blobs = self.client.list_all(ENTRY_PREFIX).await?;

        let fetched = join_all(blobs.iter().map(|blob| async move {
            (blob, self.fetch_entry(blob).await)
        }))
        .await;

        let mut entries = Vec::with_capacity(fetched.len());
        for (blob, result) in fetched {
            match result {
                Ok(record) => entries.push(record),
                Err(e) => {
                    warn!(
                        pathname = %blob.pathname,
                        error = %e,
                        "Skipping unreadable entry document"
                    );
                }
            }
        }

        entry::sort_newest_first(&mut entries);
        Ok(entries)
    }

    async fn try_get(&self, date: &str) -> Result<Option<ScrapbookEntry>, StorageError> {
        let pathname = Self::checked_pathname(date)?;
        match self.client.head(&pathname).await? {
            Some(blob) => Ok(Some(self.fetch_entry(&blob).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl StorageAdapter for BlobStorageAdapter {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Vercel
    }

    #[instrument(skip(self))]
    async fn list_entries(&self) -> Vec<ScrapbookEntry> {
        match self.try_list().await {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, "Error reading entries");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_entry(&self, date: &str) -> Option<ScrapbookEntry> {
        match self.try_get(date).await {
            Ok(found) => found,
            Err(e) => {
                warn!(date = %date, error = %e, "Entry not readable, treating as absent");
                None
            }
        }
    }

    #[instrument(skip(self, entry), fields(date = %entry.date))]
    async fn create_entry(&self, entry: &ScrapbookEntry) -> Result<(), StorageError> {
        let pathname = Self::checked_pathname(&entry.date)?;
        let json = serde_json::to_vec_pretty(entry)?;

        self.client.put(&pathname, json, "application/json").await?;

        info!(pathname = %pathname, "Created entry");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_entry_record(&self, date: &str) -> Result<(), StorageError> {
        let pathname = Self::checked_pathname(date)?;
        self.client.delete(&[pathname]).await
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload_photo(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        if !entry::is_safe_key(filename) {
            return Err(StorageError::InvalidKey(filename.to_string()));
        }
        let stored = self.client.put(filename, bytes, content_type).await?;

        info!(filename = %filename, url = %stored.url, "Uploaded photo to blob store");
        Ok(stored.url)
    }

    #[instrument(skip(self))]
    async fn delete_photo(&self, url: &str) -> Result<(), StorageError> {
        self.client.delete(&[url.to_string()]).await?;
        info!(url = %url, "Deleted blob");
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        self.client.list_page(ENTRY_PREFIX, None, Some(1)).await.is_ok()
    }
}
