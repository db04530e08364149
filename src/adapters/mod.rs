//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (file I/O, HTTP clients, the axum server).
//! Each sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `blob`: Vercel Blob REST API client
//! - `convert`: Default HEIC converter
//! - `http`: axum API router, session gate and error mapping
//! - `metrics`: Prometheus metrics export and health checks
//! - `storage`: Local and blob-store `StorageAdapter`s plus the factory

pub mod blob;
pub mod convert;
pub mod http;
pub mod metrics;
pub mod storage;
