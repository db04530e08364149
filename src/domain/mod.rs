//! Domain layer - Core scrapbook models and rules.
//!
//! Pure types and functions: the entry record, its photos, key
//! safety, timeline ordering and upload naming. No I/O happens here.

pub mod entry;
pub mod photo;

// Re-export core types for convenience
pub use entry::{EntryDraft, Photo, ScrapbookEntry, ValidationError};
