//! Admin Session Gate - Shared Password and Signed Session Tokens
//!
//! One shared admin password unlocks the mutating routes. A
//! successful login returns a token `<expiry>.<signature>` where the
//! signature is HMAC-SHA256(secret, expiry), base64url encoded. The
//! token travels as the `scrapbook_session` cookie or as a bearer
//! credential.

use std::net::IpAddr;
use std::num::NonZeroU32;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::AppState;
use super::error::ApiError;
use crate::config::AuthConfig;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "scrapbook_session";

/// Domain separator mixed into every token signature.
const TOKEN_CONTEXT: &str = "scrapbook-session:";

/// Tracked client addresses before idle buckets are pruned.
const LIMITER_PRUNE_THRESHOLD: usize = 1024;

/// Why a login attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("login attempts exhausted")]
    RateLimited,
    #[error("wrong password")]
    InvalidPassword,
    #[error("no admin password configured")]
    Disabled,
}

/// Password check, token issuance and verification.
pub struct SessionGate {
    /// HMAC of the admin password under `secret`; `None` disables login.
    password_digest: Option<[u8; 32]>,
    /// Signing key for tokens.
    secret: Vec<u8>,
    /// Token lifetime in seconds.
    ttl_seconds: i64,
    /// Login attempt limiter, one bucket per client address.
    limiter: RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>,
}

impl SessionGate {
    /// Create a gate.
    ///
    /// Without a `secret` a random key is generated, so sessions do
    /// not survive a restart.
    pub fn new(
        admin_password: Option<&str>,
        secret: Option<&str>,
        ttl_hours: u64,
        attempts_per_minute: u32,
    ) -> Self {
        let secret = secret.map_or_else(
            || format!("{}{}", Uuid::new_v4(), Uuid::new_v4()).into_bytes(),
            |s| s.as_bytes().to_vec(),
        );
        let password_digest = admin_password
            .filter(|p| !p.is_empty())
            .map(|p| hmac_sha256::HMAC::mac(p.as_bytes(), &secret));
        let ttl_seconds = i64::try_from(ttl_hours.saturating_mul(3600)).unwrap_or(i64::MAX);
        let per_minute = NonZeroU32::new(attempts_per_minute).unwrap_or(NonZeroU32::MIN);

        Self {
            password_digest,
            secret,
            ttl_seconds,
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        if config.admin_password.is_none() {
            warn!("No admin password configured; admin routes are locked");
        }
        if config.session_secret.is_none() {
            info!("No session secret configured; using a per-process key");
        }
        Self::new(
            config.admin_password.as_deref(),
            config.session_secret.as_deref(),
            config.session_ttl_hours,
            config.login_attempts_per_minute,
        )
    }

    /// Session lifetime in seconds.
    pub const fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Check `password` from `client` and issue a token on success.
    ///
    /// Attempts are budgeted per client address, so one noisy client
    /// cannot lock everyone else out.
    pub fn login(
        &self,
        client: IpAddr,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<String, LoginError> {
        if self.limiter.len() > LIMITER_PRUNE_THRESHOLD {
            self.limiter.retain_recent();
        }
        if self.limiter.check_key(&client).is_err() {
            return Err(LoginError::RateLimited);
        }
        let expected = self.password_digest.ok_or(LoginError::Disabled)?;
        let given = hmac_sha256::HMAC::mac(password.as_bytes(), &self.secret);
        if !constant_time_eq(&given, &expected) {
            return Err(LoginError::InvalidPassword);
        }
        Ok(self.issue_token(now))
    }

    /// Issue a token valid for the configured lifetime from `now`.
    pub fn issue_token(&self, now: DateTime<Utc>) -> String {
        let expiry = now.timestamp().saturating_add(self.ttl_seconds);
        format!("{expiry}.{}", URL_SAFE_NO_PAD.encode(self.mac(expiry)))
    }

    /// Whether `token` carries a valid signature and has not expired.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> bool {
        let Some((expiry, signature)) = token.split_once('.') else {
            return false;
        };
        let Ok(expiry) = expiry.parse::<i64>() else {
            return false;
        };
        let Ok(given) = URL_SAFE_NO_PAD.decode(signature) else {
            return false;
        };
        let expected = self.mac(expiry);
        // Both checks always run.
        let fresh = expiry > now.timestamp();
        constant_time_eq(&given, &expected) & fresh
    }

    fn mac(&self, expiry: i64) -> [u8; 32] {
        let message = format!("{TOKEN_CONTEXT}{expiry}");
        hmac_sha256::HMAC::mac(message.as_bytes(), &self.secret)
    }

    /// `Set-Cookie` value carrying `token`.
    pub fn session_cookie(&self, token: &str) -> String {
        format!(
            "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.ttl_seconds
        )
    }

    /// `Set-Cookie` value that clears the session.
    pub fn cleared_cookie() -> String {
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
}

/// Byte equality whose running time depends only on the lengths.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Session token from the cookie header, else from a bearer credential.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
    })
}

/// Extractor proving the request carries a valid admin session.
///
/// Rejects with 401 before any body extraction runs.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match token_from_headers(&parts.headers) {
            Some(token) if state.session.verify(&token, Utc::now()) => Ok(Self),
            _ => Err(ApiError::Unauthorized),
        }
    }
}
