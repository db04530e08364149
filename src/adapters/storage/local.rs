//! Local Storage Adapter - JSON Documents and Photo Files on Disk
//!
//! Entries live in `entries_dir` as one pretty-printed `<date>.json`
//! per entry. Photo payloads live in `uploads_dir` under their
//! generated filename and are addressed by `<public_prefix>/<filename>`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{error, info, instrument, warn};

use crate::config::LocalStorageConfig;
use crate::domain::entry::{self, ScrapbookEntry};
use crate::ports::storage::{StorageAdapter, StorageBackend, StorageError};

/// Filesystem-backed storage adapter.
#[derive(Debug, Clone)]
pub struct LocalStorageAdapter {
    /// Directory holding entry documents.
    entries_dir: PathBuf,
    /// Directory holding photo payloads.
    uploads_dir: PathBuf,
    /// URL prefix returned for uploaded photos (no trailing slash).
    public_prefix: String,
}

impl LocalStorageAdapter {
    /// Create an adapter over the given directories.
    ///
    /// Directories are created lazily on first write.
    pub fn new(
        entries_dir: impl Into<PathBuf>,
        uploads_dir: impl Into<PathBuf>,
        public_prefix: impl Into<String>,
    ) -> Self {
        Self {
            entries_dir: entries_dir.into(),
            uploads_dir: uploads_dir.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &LocalStorageConfig) -> Self {
        Self::new(&config.entries_dir, &config.uploads_dir, &config.public_prefix)
    }

    /// Directory photo payloads are written to.
    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    fn entry_path(&self, date: &str) -> Result<PathBuf, StorageError> {
        if !entry::is_safe_key(date) {
            return Err(StorageError::InvalidKey(date.to_string()));
        }
        Ok(self.entries_dir.join(entry::entry_file_name(date)))
    }

    fn upload_path(&self, filename: &str) -> Result<PathBuf, StorageError> {
        if !entry::is_safe_key(filename) {
            return Err(StorageError::InvalidKey(filename.to_string()));
        }
        Ok(self.uploads_dir.join(filename))
    }

    async fn read_entry(path: &Path) -> Result<ScrapbookEntry, StorageError> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn try_list(&self) -> Result<Vec<ScrapbookEntry>, StorageError> {
        fs::create_dir_all(&self.entries_dir).await?;

        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&self.entries_dir).await?;

        while let Some(item) = dir.next_entry().await? {
            let path = item.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match Self::read_entry(&path).await {
                Ok(record) => entries.push(record),
                Err(e) => {
                    warn!(
                        file = %path.display(),
                        error = %e,
                        "Skipping unreadable entry document"
                    );
                }
            }
        }

        entry::sort_newest_first(&mut entries);
        Ok(entries)
    }
}

#[async_trait]
impl StorageAdapter for LocalStorageAdapter {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Local
    }

    #[instrument(skip(self))]
    async fn list_entries(&self) -> Vec<ScrapbookEntry> {
        match self.try_list().await {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, dir = %self.entries_dir.display(), "Error reading entries");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_entry(&self, date: &str) -> Option<ScrapbookEntry> {
        let result = match self.entry_path(date) {
            Ok(path) => Self::read_entry(&path).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(date = %date, error = %e, "Entry not readable, treating as absent");
                None
            }
        }
    }

    #[instrument(skip(self, entry), fields(date = %entry.date))]
    async fn create_entry(&self, entry: &ScrapbookEntry) -> Result<(), StorageError> {
        let path = self.entry_path(&entry.date)?;
        fs::create_dir_all(&self.entries_dir).await?;

        let json = serde_json::to_string_pretty(entry)?;
        fs::write(&path, json).await?;

        info!(file = %path.display(), "Created entry");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_entry_record(&self, date: &str) -> Result<(), StorageError> {
        let path = self.entry_path(date)?;
        fs::remove_file(&path).await?;
        Ok(())
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload_photo(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let path = self.upload_path(filename)?;
        fs::create_dir_all(&self.uploads_dir).await?;
        fs::write(&path, bytes).await?;

        info!(filename = %filename, content_type = %content_type, "Uploaded photo");
        Ok(format!("{}/{filename}", self.public_prefix))
    }

    #[instrument(skip(self))]
    async fn delete_photo(&self, url: &str) -> Result<(), StorageError> {
        let filename = url.rsplit('/').next().unwrap_or_default();
        if filename.is_empty() {
            return Ok(());
        }

        let path = self.upload_path(filename)?;
        fs::remove_file(&path).await?;

        info!(filename = %filename, "Deleted photo");
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        if fs::create_dir_all(&self.entries_dir).await.is_err() {
            return false;
        }
        let probe = self.entries_dir.join(".health_check");
        let result = fs::write(&probe, b"ok").await;
        let _ = fs::remove_file(&probe).await;
        result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(root: &Path) -> LocalStorageAdapter {
        LocalStorageAdapter::new(root.join("entries"), root.join("uploads"), "/uploads/")
    }

    #[test]
    fn test_public_prefix_trailing_slash_trimmed() {
        let a = LocalStorageAdapter::new("e", "u", "/media/");
        assert_eq!(a.public_prefix, "/media");
    }

    #[test]
    fn test_entry_path_rejects_traversal() {
        let a = LocalStorageAdapter::new("e", "u", "/uploads");
        assert!(matches!(
            a.entry_path("../secrets"),
            Err(StorageError::InvalidKey(_))
        ));
        assert_eq!(
            a.entry_path("2026-01-29").unwrap(),
            Path::new("e").join("2026-01-29.json")
        );
    }

    #[tokio::test]
    async fn test_delete_photo_with_empty_segment_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let a = adapter(dir.path());
        assert!(a.delete_photo("/uploads/").await.is_ok());
    }

    #[tokio::test]
    async fn test_health_probe_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = adapter(dir.path());
        assert!(a.is_healthy().await);
        assert!(a.list_entries().await.is_empty());
        let mut rd = std::fs::read_dir(dir.path().join("entries")).unwrap();
        assert!(rd.next().is_none());
    }
}
