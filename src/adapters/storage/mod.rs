//! Storage Adapters - Local Disk and Remote Blob Store
//!
//! Implements the `StorageAdapter` port twice and provides the
//! factory that chooses between them at start-up.

pub mod blob;
pub mod factory;
pub mod local;

pub use blob::BlobStorageAdapter;
pub use factory::{build_adapter, select_backend};
pub use local::LocalStorageAdapter;
