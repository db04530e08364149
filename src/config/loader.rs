//! Configuration Loader - File Loading, Env Overrides and Validation
//!
//! Reads `config.toml` when present, layers environment variables on
//! top, and validates the result with clear error messages.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Backend override (`local` or `vercel`).
pub const ENV_STORAGE_ADAPTER: &str = "STORAGE_ADAPTER";
/// Blob store credential; its presence selects the blob backend.
pub const ENV_BLOB_TOKEN: &str = "BLOB_READ_WRITE_TOKEN";
/// Shared admin password.
pub const ENV_ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";
/// HMAC key for session tokens.
pub const ENV_SESSION_SECRET: &str = "SESSION_SECRET";

/// Load configuration from `path` and the process environment.
///
/// A missing file is not an error: defaults are used and the
/// environment still applies.
///
/// # Errors
/// Returns detailed error if:
/// - The file exists but can't be read or parsed
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an explicit environment lookup.
pub fn load_config_with<F>(path: &str, env: F) -> Result<AppConfig>
where
  F: Fn(&str) -> Option<String>,
{
  let path = Path::new(path);

  let mut config = if path.exists() {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)?
  } else {
    AppConfig::default()
  };

  apply_env_overrides(&mut config, env);
  validate_config(&config)?;

  Ok(config)
}

/// Report where the configuration came from and what it selects.
///
/// Loading happens before the subscriber exists (the log level is
/// part of the config), so this runs once logging is up.
pub fn log_loaded(config: &AppConfig, path: &str) {
  if Path::new(path).exists() {
    info!(path, "Read config file");
  } else {
    info!(path, "No config file found, using defaults");
  }

  info!(
    bind = %config.server.bind_address,
    adapter_override = ?config.storage.adapter,
    blob_token_present = config.storage.blob_token.is_some(),
    "Configuration loaded successfully"
  );
}

/// Parse TOML configuration text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  toml::from_str(content).with_context(|| "Failed to parse config.toml")
}

/// Overlay environment variables on top of file configuration.
///
/// Blank values count as unset, so an empty `BLOB_READ_WRITE_TOKEN`
/// does not trigger blob auto-selection.
pub fn apply_env_overrides<F>(config: &mut AppConfig, env: F)
where
  F: Fn(&str) -> Option<String>,
{
  let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

  if let Some(adapter) = lookup(ENV_STORAGE_ADAPTER) {
    config.storage.adapter = Some(adapter);
  }
  if let Some(token) = lookup(ENV_BLOB_TOKEN) {
    config.storage.blob_token = Some(token);
  }
  if let Some(password) = lookup(ENV_ADMIN_PASSWORD) {
    config.auth.admin_password = Some(password);
  }
  if let Some(secret) = lookup(ENV_SESSION_SECRET) {
    config.auth.session_secret = Some(secret);
  }

  // Blank file values are treated the same way.
  config.storage.blob_token = config
    .storage
    .blob_token
    .take()
    .filter(|t| !t.trim().is_empty());
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  let local = &config.storage.local;

  anyhow::ensure!(
    !config.server.bind_address.is_empty(),
    "server.bind_address must not be empty"
  );
  anyhow::ensure!(
    config.server.max_upload_bytes > 0,
    "server.max_upload_bytes must be positive"
  );
  anyhow::ensure!(
    !local.entries_dir.is_empty(),
    "storage.local.entries_dir must not be empty"
  );
  anyhow::ensure!(
    !local.uploads_dir.is_empty(),
    "storage.local.uploads_dir must not be empty"
  );
  anyhow::ensure!(
    local.public_prefix.starts_with('/') && local.public_prefix.len() > 1,
    "storage.local.public_prefix must be a root-relative path, got {:?}",
    local.public_prefix
  );
  anyhow::ensure!(
    !local.public_prefix.ends_with('/'),
    "storage.local.public_prefix must not end with '/', got {:?}",
    local.public_prefix
  );
  anyhow::ensure!(
    !config.storage.blob.base_url.is_empty(),
    "storage.blob.base_url must not be empty"
  );
  anyhow::ensure!(
    config.storage.blob.timeout_seconds > 0,
    "storage.blob.timeout_seconds must be positive"
  );
  anyhow::ensure!(
    config.auth.session_ttl_hours > 0,
    "auth.session_ttl_hours must be positive"
  );
  anyhow::ensure!(
    config.auth.login_attempts_per_minute > 0,
    "auth.login_attempts_per_minute must be positive"
  );

  Ok(())
}
