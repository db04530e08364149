//! Storage Factory - Backend Selection Policy
//!
//! Picks the backend from explicit configuration, once, at start-up:
//! 1. an override of `local` or `vercel` wins outright;
//! 2. otherwise a configured blob token selects the blob store;
//! 3. otherwise entries stay on the local disk.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::blob::BlobStorageAdapter;
use super::local::LocalStorageAdapter;
use crate::adapters::blob::{BlobClient, BlobClientConfig};
use crate::config::StorageConfig;
use crate::ports::storage::{StorageAdapter, StorageBackend};

/// Decide which backend `config` selects. Pure: no I/O, no env access.
pub fn select_backend(config: &StorageConfig) -> StorageBackend {
    if let Some(forced) = config.adapter.as_deref().and_then(StorageBackend::from_override) {
        return forced;
    }

    if config.blob_token.as_deref().is_some_and(|t| !t.is_empty()) {
        StorageBackend::Vercel
    } else {
        StorageBackend::Local
    }
}

/// Construct the adapter `config` selects.
pub fn build_adapter(config: &StorageConfig) -> Result<Arc<dyn StorageAdapter>> {
    let backend = select_backend(config);
    let forced = config
        .adapter
        .as_deref()
        .is_some_and(|v| StorageBackend::from_override(v).is_some());

    if let Some(unknown) = config.adapter.as_deref().filter(|_| !forced) {
        warn!(value = %unknown, "Ignoring unrecognised storage adapter override");
    }

    info!(
        backend = %backend,
        selection = if forced { "forced" } else { "auto-detected" },
        "Using storage adapter"
    );

    match backend {
        StorageBackend::Local => Ok(Arc::new(LocalStorageAdapter::from_config(&config.local))),
        StorageBackend::Vercel => {
            if config.blob_token.is_none() {
                warn!("Blob store selected without a token; requests will be rejected");
            }
            let client = BlobClient::new(BlobClientConfig::from_config(config))
                .context("Failed to build blob store client")?;
            Ok(Arc::new(BlobStorageAdapter::new(client)))
        }
    }
}
