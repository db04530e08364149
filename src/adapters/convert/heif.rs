//! libheif-backed HEIC/HEIF decoder.

use async_trait::async_trait;
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};
use tracing::{debug, instrument};

use super::jpeg;
use crate::ports::converter::{ConversionError, ImageConverter};

/// Decodes the primary image with libheif and re-encodes it as JPEG.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeifConverter;

impl HeifConverter {
    pub const fn new() -> Self {
        Self
    }

    /// Blocking decode + encode; run off the async executor.
    pub fn convert(input: &[u8], quality: f32) -> Result<Vec<u8>, ConversionError> {
        let decode_err = |e: libheif_rs::HeifError| ConversionError::Decode(e.to_string());

        let lib = LibHeif::new();
        let context = HeifContext::read_from_bytes(input).map_err(decode_err)?;
        let handle = context.primary_image_handle().map_err(decode_err)?;
        let decoded = lib
            .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
            .map_err(decode_err)?;

        let plane = decoded
            .planes()
            .interleaved
            .ok_or_else(|| ConversionError::Decode("no interleaved RGB plane".to_string()))?;

        let (width, height) = (plane.width, plane.height);
        let row_bytes = width as usize * 3;
        let pixels = jpeg::pack_rows(plane.data, plane.stride, row_bytes, height as usize)
            .ok_or_else(|| ConversionError::Decode("truncated RGB plane".to_string()))?;

        debug!(width, height, "Decoded HEIC image");
        jpeg::encode_rgb(width, height, pixels, quality)
    }
}

#[async_trait]
impl ImageConverter for HeifConverter {
    #[instrument(skip(self, input), fields(size = input.len()))]
    async fn heic_to_jpeg(&self, input: Vec<u8>, quality: f32) -> Result<Vec<u8>, ConversionError> {
        tokio::task::spawn_blocking(move || Self::convert(&input, quality))
            .await
            .map_err(|e| ConversionError::Decode(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_input_is_a_decode_error() {
        let result = HeifConverter::new().heic_to_jpeg(b"not a heic file".to_vec(), 0.9).await;
        assert!(matches!(result, Err(ConversionError::Decode(_))));
    }
}
