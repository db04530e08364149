//! Configuration Module - TOML-based Service Configuration
//!
//! Loads configuration from `config.toml` (every section optional)
//! and then applies environment variable overrides. The resulting
//! value is built once at start-up and passed down explicitly;
//! nothing re-reads the environment per request.

pub mod loader;

use serde::Deserialize;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// HTTP server settings.
  #[serde(default)]
  pub server: ServerConfig,
  /// Storage backend selection and per-backend settings.
  #[serde(default)]
  pub storage: StorageConfig,
  /// Admin password gate.
  #[serde(default)]
  pub auth: AuthConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Bind address for the API (and health/metrics routes).
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Maximum accepted request body, in bytes (bounds photo uploads).
  #[serde(default = "default_max_upload_bytes")]
  pub max_upload_bytes: usize,
}

/// Storage configuration.
///
/// `adapter` and `blob_token` drive backend selection; see
/// `adapters::storage::factory::select_backend`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
  /// Explicit backend override (`local` or `vercel`).
  #[serde(default)]
  pub adapter: Option<String>,
  /// Blob store read/write token. Its presence selects the blob backend
  /// when no override is set.
  #[serde(default)]
  pub blob_token: Option<String>,
  /// Local filesystem backend.
  #[serde(default)]
  pub local: LocalStorageConfig,
  /// Remote blob store backend.
  #[serde(default)]
  pub blob: BlobStorageConfig,
}

/// Local filesystem backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalStorageConfig {
  /// Directory holding one `<date>.json` per entry.
  #[serde(default = "default_entries_dir")]
  pub entries_dir: String,
  /// Directory holding uploaded photo payloads.
  #[serde(default = "default_uploads_dir")]
  pub uploads_dir: String,
  /// Root-relative URL prefix under which uploads are served.
  #[serde(default = "default_public_prefix")]
  pub public_prefix: String,
}

/// Remote blob store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BlobStorageConfig {
  /// Blob store REST API base URL.
  #[serde(default = "default_blob_base_url")]
  pub base_url: String,
  /// Value sent as `x-api-version`.
  #[serde(default = "default_blob_api_version")]
  pub api_version: String,
  /// Request timeout in seconds.
  #[serde(default = "default_timeout")]
  pub timeout_seconds: u64,
}

/// Admin password gate configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
  /// Shared admin password. Login is impossible while unset.
  #[serde(default)]
  pub admin_password: Option<String>,
  /// HMAC key for session tokens. Random per process when unset.
  #[serde(default)]
  pub session_secret: Option<String>,
  /// Session lifetime in hours.
  #[serde(default = "default_session_ttl")]
  pub session_ttl_hours: u64,
  /// Login attempts allowed per minute, process wide.
  #[serde(default = "default_login_attempts")]
  pub login_attempts_per_minute: u32,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_bind_address(),
      log_level: default_log_level(),
      max_upload_bytes: default_max_upload_bytes(),
    }
  }
}

impl Default for LocalStorageConfig {
  fn default() -> Self {
    Self {
      entries_dir: default_entries_dir(),
      uploads_dir: default_uploads_dir(),
      public_prefix: default_public_prefix(),
    }
  }
}

impl Default for BlobStorageConfig {
  fn default() -> Self {
    Self {
      base_url: default_blob_base_url(),
      api_version: default_blob_api_version(),
      timeout_seconds: default_timeout(),
    }
  }
}

impl Default for AuthConfig {
  fn default() -> Self {
    Self {
      admin_password: None,
      session_secret: None,
      session_ttl_hours: default_session_ttl(),
      login_attempts_per_minute: default_login_attempts(),
    }
  }
}

// Default value functions for serde

fn default_bind_address() -> String {
  "0.0.0.0:3000".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_max_upload_bytes() -> usize {
  26_214_400 // 25 MB
}

fn default_entries_dir() -> String {
  "data/entries".to_string()
}

fn default_uploads_dir() -> String {
  "public/uploads".to_string()
}

fn default_public_prefix() -> String {
  "/uploads".to_string()
}

fn default_blob_base_url() -> String {
  "https://blob.vercel-storage.com".to_string()
}

fn default_blob_api_version() -> String {
  "7".to_string()
}

fn default_timeout() -> u64 {
  30
}

fn default_session_ttl() -> u64 {
  168 // one week
}

fn default_login_attempts() -> u32 {
  10
}
