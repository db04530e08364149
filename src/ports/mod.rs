//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use-case layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `StorageAdapter`: Entry and photo persistence (local disk or blob store)
//! - `ImageConverter`: HEIC to JPEG re-encoding for uploads

pub mod converter;
pub mod storage;

pub use converter::{ConversionError, ImageConverter};
pub use storage::{CascadeReport, StorageAdapter, StorageBackend, StorageError};
