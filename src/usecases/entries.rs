//! Entries Use Case - Facade over the Selected Storage Adapter
//!
//! Forwards every entry operation to the adapter chosen at start-up.
//! It adds no validation or error translation of its own: the
//! adapter's read-collapses-to-absent and write-propagates contract
//! is exactly what callers observe.

use std::sync::Arc;

use anyhow::Result;

use crate::adapters::storage::build_adapter;
use crate::config::StorageConfig;
use crate::domain::entry::ScrapbookEntry;
use crate::ports::storage::{StorageAdapter, StorageError};

/// Entry operations bound to one storage backend.
#[derive(Clone)]
pub struct EntriesService {
    storage: Arc<dyn StorageAdapter>,
}

impl EntriesService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// Resolve the adapter from configuration and wrap it.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        Ok(Self::new(build_adapter(config)?))
    }

    /// The adapter this service forwards to.
    pub fn storage(&self) -> &Arc<dyn StorageAdapter> {
        &self.storage
    }

    pub async fn list_entries(&self) -> Vec<ScrapbookEntry> {
        self.storage.list_entries().await
    }

    pub async fn get_entry(&self, date: &str) -> Option<ScrapbookEntry> {
        self.storage.get_entry(date).await
    }

    pub async fn create_entry(&self, entry: &ScrapbookEntry) -> Result<(), StorageError> {
        self.storage.create_entry(entry).await
    }

    pub async fn delete_entry(&self, date: &str) -> Result<(), StorageError> {
        self.storage.delete_entry(date).await
    }
}
