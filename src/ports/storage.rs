//! Storage Port - Entry and Photo Persistence Interface
//!
//! Every backend (local filesystem, remote blob store) implements
//! the same contract. Read paths never fail: a missing or unreadable
//! record is reported as absent. Write paths propagate their errors,
//! except photo deletions performed as part of an entry cascade,
//! which are best-effort.

use std::fmt;

use async_trait::async_trait;
use futures_util::future::join_all;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::entry::ScrapbookEntry;

/// Which concrete backend an adapter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
  /// JSON documents and photo files on the local disk.
  Local,
  /// Vercel Blob object store.
  Vercel,
}

impl StorageBackend {
  /// Parse an explicit override value (`local` or `vercel`).
  ///
  /// Matching is exact; anything else yields `None`.
  pub fn from_override(value: &str) -> Option<Self> {
    match value {
      "local" => Some(Self::Local),
      "vercel" => Some(Self::Vercel),
      _ => None,
    }
  }
}

impl fmt::Display for StorageBackend {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Local => write!(f, "local"),
      Self::Vercel => write!(f, "vercel"),
    }
  }
}

/// Failures surfaced by write paths.
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("blob store request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("blob store returned {status} during {operation}: {body}")]
  RemoteStatus {
    operation: &'static str,
    status: u16,
    body: String,
  },

  #[error("invalid storage key: {0:?}")]
  InvalidKey(String),
}

/// Outcome of the best-effort photo cascade inside `delete_entry`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
  /// Photo deletions dispatched.
  pub attempted: usize,
  /// Photo deletions that failed (logged and ignored).
  pub failed: usize,
}

/// Entry and photo persistence contract.
///
/// `delete_entry` is provided: it reads the entry, cascades to its
/// photos via [`cascade_delete_photos`], then removes the record with
/// [`StorageAdapter::delete_entry_record`]. Backends only supply the
/// record deletion.
#[async_trait]
pub trait StorageAdapter: Send + Sync + 'static {
  /// Backend kind, for logging and health reporting.
  fn backend(&self) -> StorageBackend;

  /// All entries, newest date first. Empty on any failure.
  async fn list_entries(&self) -> Vec<ScrapbookEntry>;

  /// Entry stored under `date`, or `None` if absent or unreadable.
  async fn get_entry(&self, date: &str) -> Option<ScrapbookEntry>;

  /// Persist `entry` under its date key, overwriting any previous one.
  async fn create_entry(&self, entry: &ScrapbookEntry) -> Result<(), StorageError>;

  /// Remove only the entry record stored under `date`.
  async fn delete_entry_record(&self, date: &str) -> Result<(), StorageError>;

  /// Store a photo payload and return its resolvable URL.
  async fn upload_photo(
    &self,
    bytes: Vec<u8>,
    filename: &str,
    content_type: &str,
  ) -> Result<String, StorageError>;

  /// Remove the photo addressed by `url`.
  async fn delete_photo(&self, url: &str) -> Result<(), StorageError>;

  /// Whether the backend is reachable and writable.
  async fn is_healthy(&self) -> bool;

  /// Delete the entry for `date` together with its photos.
  ///
  /// Photo failures never abort the cascade; only the final record
  /// deletion can fail the call.
  async fn delete_entry(&self, date: &str) -> Result<(), StorageError> {
    if let Some(entry) = self.get_entry(date).await {
      let report = cascade_delete_photos(self, &entry).await;
      if report.attempted > 0 {
        info!(
          date = %date,
          attempted = report.attempted,
          failed = report.failed,
          "Photo cascade settled"
        );
      }
    }

    self.delete_entry_record(date).await?;
    info!(date = %date, backend = %self.backend(), "Deleted entry");
    Ok(())
  }
}

/// Delete every photo owned by `entry` concurrently.
///
/// All deletions are dispatched at once and every outcome is
/// collected; failures are logged at warn and counted, never returned.
pub async fn cascade_delete_photos<S>(storage: &S, entry: &ScrapbookEntry) -> CascadeReport
where
  S: StorageAdapter + ?Sized,
{
  let outcomes = join_all(entry.photos.iter().map(|photo| async move {
    let result = storage.delete_photo(&photo.url).await;
    if let Err(e) = &result {
      warn!(url = %photo.url, error = %e, "Failed to delete photo");
    }
    result.is_ok()
  }))
  .await;

  CascadeReport {
    attempted: outcomes.len(),
    failed: outcomes.iter().filter(|ok| !**ok).count(),
  }
}
