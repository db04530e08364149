//! JPEG encoding of decoded RGB frames.

use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;

use crate::ports::converter::ConversionError;

/// Map a 0.0 to 1.0 quality onto the encoder's 1 to 100 scale.
pub fn quality_percent(quality: f32) -> u8 {
    // Clamped to 1..=100, so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = (quality.clamp(0.0, 1.0) * 100.0).round() as u8;
    percent.max(1)
}

/// Encode tightly packed RGB8 rows as JPEG.
pub fn encode_rgb(
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    quality: f32,
) -> Result<Vec<u8>, ConversionError> {
    let frame = RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
        ConversionError::Encode(format!("pixel buffer does not match {width}x{height}"))
    })?;

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality_percent(quality))
        .encode_image(&frame)
        .map_err(|e| ConversionError::Encode(e.to_string()))?;
    Ok(out)
}

/// Copy `height` rows of `row_bytes` out of a strided plane.
pub fn pack_rows(data: &[u8], stride: usize, row_bytes: usize, height: usize) -> Option<Vec<u8>> {
    let mut packed = Vec::with_capacity(row_bytes * height);
    for row in 0..height {
        let start = row * stride;
        packed.extend_from_slice(data.get(start..start + row_bytes)?);
    }
    Some(packed)
}
