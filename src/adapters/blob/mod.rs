//! Blob Store Client - Remote Object Storage over HTTPS
//!
//! Thin REST client for the Vercel Blob API. The storage adapter in
//! `adapters::storage::blob` builds on top of it.

pub mod client;
pub mod types;

pub use client::{BlobClient, BlobClientConfig};
pub use types::{BlobObject, ListBlobsPage, PutBlobResult};
