//! Image Converter Port - HEIC Re-encoding Interface
//!
//! Uploads in HEIC/HEIF format are re-encoded to JPEG before they
//! reach storage. The codec itself lives outside this crate; an
//! adapter plugs it in behind this trait.

use async_trait::async_trait;
use thiserror::Error;

/// Failures raised while re-encoding an image.
#[derive(Debug, Error)]
pub enum ConversionError {
  #[error("no HEIC codec is available")]
  Unavailable,

  #[error("HEIC decode failed: {0}")]
  Decode(String),

  #[error("JPEG encode failed: {0}")]
  Encode(String),
}

/// Converts HEIC/HEIF payloads to JPEG.
#[async_trait]
pub trait ImageConverter: Send + Sync + 'static {
  /// Re-encode `input` as JPEG at `quality` (0.0 to 1.0).
  async fn heic_to_jpeg(&self, input: Vec<u8>, quality: f32) -> Result<Vec<u8>, ConversionError>;
}
