//! Image Converters - HEIC/HEIF to JPEG
//!
//! `HeifConverter` decodes with libheif (cargo feature `heic`) and
//! re-encodes with the `image` crate's JPEG encoder. Builds without the
//! feature ship `UnavailableConverter`, which refuses every request so
//! the upload route reports a conversion failure.

#[cfg(feature = "heic")]
pub mod heif;
pub mod jpeg;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::ports::converter::{ConversionError, ImageConverter};

#[cfg(feature = "heic")]
pub use heif::HeifConverter;

/// Converter used when no HEIC codec is compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableConverter;

#[async_trait]
impl ImageConverter for UnavailableConverter {
    async fn heic_to_jpeg(&self, input: Vec<u8>, _quality: f32) -> Result<Vec<u8>, ConversionError> {
        warn!(size = input.len(), "HEIC upload received but no codec is configured");
        Err(ConversionError::Unavailable)
    }
}

/// The best converter this build offers.
#[cfg(feature = "heic")]
pub fn default_converter() -> Arc<dyn ImageConverter> {
    info!(codec = "libheif", "HEIC conversion enabled");
    Arc::new(HeifConverter::new())
}

/// The best converter this build offers.
#[cfg(not(feature = "heic"))]
pub fn default_converter() -> Arc<dyn ImageConverter> {
    info!("Built without the `heic` feature; HEIC uploads will be refused");
    Arc::new(UnavailableConverter)
}
