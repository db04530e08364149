//! Photo upload naming rules.
//!
//! Uploaded payloads are stored under a generated `<uuid>.<ext>`
//! name. HEIC/HEIF inputs are re-encoded as JPEG before storage,
//! so their stored extension and content type change.

use uuid::Uuid;

/// Placeholder width reported for every upload.
pub const PLACEHOLDER_WIDTH: u32 = 800;
/// Placeholder height reported for every upload.
pub const PLACEHOLDER_HEIGHT: u32 = 600;

/// JPEG quality used when re-encoding HEIC uploads.
pub const HEIC_JPEG_QUALITY: f32 = 0.9;

/// Fallback content type when the client sends none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Lower-cased extension of an uploaded file name.
///
/// Takes the text after the last `.` (the whole name when there is
/// none) and keeps ASCII alphanumerics only. Falls back to `bin`.
pub fn extension_of(file_name: &str) -> String {
    let raw = file_name.rsplit('.').next().unwrap_or_default();
    let ext: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if ext.is_empty() { "bin".to_string() } else { ext }
}

/// Whether the extension denotes a HEIC/HEIF image.
pub fn is_heic(ext: &str) -> bool {
    matches!(ext, "heic" | "heif")
}

/// Fresh storage filename for an upload with extension `ext`.
pub fn generate_filename(ext: &str) -> String {
    format!("{}.{ext}", Uuid::new_v4())
}

/// Content type for a stored file, guessed from its extension.
///
/// Used when serving local uploads back to browsers.
pub fn content_type_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "json" => "application/json",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
