//! Upload Use Case - Photo Ingestion
//!
//! Upload flow:
//! 1. Derive the lower-cased extension from the client file name
//! 2. Re-encode HEIC/HEIF payloads to JPEG via the converter port
//! 3. Generate a `<uuid>.<ext>` storage filename
//! 4. Hand the payload to the storage adapter and report its URL
//!    with the placeholder dimensions

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::domain::photo::{self, HEIC_JPEG_QUALITY, PLACEHOLDER_HEIGHT, PLACEHOLDER_WIDTH};
use crate::ports::converter::{ConversionError, ImageConverter};
use crate::ports::storage::{StorageAdapter, StorageError};

/// Result reported to the admin client after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedPhoto {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("image conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// Stores uploaded photos through the configured adapter.
#[derive(Clone)]
pub struct PhotoUploader {
    storage: Arc<dyn StorageAdapter>,
    converter: Arc<dyn ImageConverter>,
}

impl PhotoUploader {
    pub fn new(storage: Arc<dyn StorageAdapter>, converter: Arc<dyn ImageConverter>) -> Self {
        Self { storage, converter }
    }

    /// Ingest one uploaded file.
    ///
    /// `content_type` is the client-declared type; it is replaced by
    /// `image/jpeg` when the payload is re-encoded.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<UploadedPhoto, UploadError> {
        let mut ext = photo::extension_of(original_name);
        let mut content_type = content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or(photo::DEFAULT_CONTENT_TYPE)
            .to_string();

        let payload = if photo::is_heic(&ext) {
            info!("Converting HEIC to JPEG");
            let converted = self
                .converter
                .heic_to_jpeg(bytes, HEIC_JPEG_QUALITY)
                .await
                .inspect_err(|e| error!(error = %e, "HEIC conversion failed"))?;
            ext = "jpg".to_string();
            content_type = "image/jpeg".to_string();
            converted
        } else {
            bytes
        };

        let filename = photo::generate_filename(&ext);
        let url = self
            .storage
            .upload_photo(payload, &filename, &content_type)
            .await?;

        Ok(UploadedPhoto {
            url,
            width: PLACEHOLDER_WIDTH,
            height: PLACEHOLDER_HEIGHT,
        })
    }
}
