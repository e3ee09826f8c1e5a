// ABOUTME: Session issuing, validation and revocation on top of a pluggable store
// ABOUTME: Sessions are random 256-bit ids bound to a user and role with a fixed lifetime
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Sessions
//!
//! [`SessionManager`] owns the lifecycle; a [`SessionStore`] only keeps records.
//! The cookie token is the session id plus its HMAC, so a forged or altered
//! cookie is rejected before the store is consulted.

/// In-memory session store with background purge
pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use panel_core::errors::{AppError, AppResult};
use panel_core::models::User;
use panel_core::permissions::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::session;
use crate::logging::AppLogger;
use crate::security::SessionSigner;

pub use memory::InMemorySessionStore;

/// Server-side session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// 64 hex characters
    pub session_id: String,
    /// Owning user
    pub user_id: Uuid,
    /// Owning user's login name
    pub username: String,
    /// Role captured at login
    pub role: UserRole,
    /// Issue time
    pub created_at: DateTime<Utc>,
    /// Expiry time
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is past its expiry at `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the session is past its expiry
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Storage backend for sessions
///
/// Implementations must be safe to share across request tasks.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session. Returns `false` without overwriting if the id exists.
    async fn insert(&self, session: Session) -> AppResult<bool>;

    /// Fetch a session by id, expired or not
    async fn get(&self, session_id: &str) -> AppResult<Option<Session>>;

    /// Remove a session by id, returning it if present
    async fn remove(&self, session_id: &str) -> AppResult<Option<Session>>;

    /// Drop every expired session, returning how many were removed
    async fn purge_expired(&self) -> AppResult<usize>;

    /// Number of unexpired sessions
    async fn active_count(&self) -> AppResult<usize>;
}

/// A newly issued session and its cookie token
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Signed token for the cookie
    pub token: String,
    /// Stored record
    pub session: Session,
}

/// Issues, validates and revokes sessions
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    signer: SessionSigner,
    ttl: chrono::Duration,
    ttl_secs: u64,
}

impl SessionManager {
    /// Create a manager with the given store, signer and session lifetime
    ///
    /// # Errors
    ///
    /// Returns an error if the lifetime does not fit in a timestamp offset
    pub fn new(store: Arc<dyn SessionStore>, signer: SessionSigner, ttl_secs: u64) -> AppResult<Self> {
        let ttl = chrono::Duration::from_std(Duration::from_secs(ttl_secs)).map_err(|e| {
            AppError::config_invalid(format!("Session TTL out of range: {e}")).with_source(e)
        })?;
        Ok(Self {
            store,
            signer,
            ttl,
            ttl_secs,
        })
    }

    /// Session lifetime in seconds, used for the cookie `Max-Age`
    #[must_use]
    pub const fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Create and store a session for an authenticated user
    ///
    /// # Errors
    ///
    /// Returns an error if the RNG fails, the store fails, or no unique id
    /// could be generated
    pub async fn issue(&self, user: &User) -> AppResult<IssuedSession> {
        for _ in 0..session::MAX_ID_ATTEMPTS {
            let now = Utc::now();
            let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
                AppError::config_invalid(format!(
                    "Session TTL of {}s overflows the expiry timestamp",
                    self.ttl_secs
                ))
            })?;
            let record = Session {
                session_id: generate_session_id()?,
                user_id: user.id,
                username: user.username.clone(),
                role: user.role,
                created_at: now,
                expires_at,
            };

            if self.store.insert(record.clone()).await? {
                AppLogger::log_session_event(&record.session_id, &record.username, "issued");
                return Ok(IssuedSession {
                    token: self.signer.sign(&record.session_id),
                    session: record,
                });
            }
            tracing::warn!("Session id collision, regenerating");
        }

        Err(AppError::internal("Could not generate a unique session id"))
    }

    /// Resolve a cookie token to its live session
    ///
    /// # Errors
    ///
    /// Returns `SESSION_INVALID` if the token is malformed, badly signed,
    /// unknown or expired
    pub async fn validate(&self, token: &str) -> AppResult<Session> {
        let Some(session_id) = self.signer.verify(token) else {
            AppLogger::log_security_event(
                "session_signature_invalid",
                "medium",
                "Session token failed signature check",
                None,
            );
            return Err(AppError::session_invalid());
        };

        let record = self
            .store
            .get(session_id)
            .await?
            .ok_or_else(AppError::session_invalid)?;

        if record.is_expired() {
            self.store.remove(session_id).await?;
            AppLogger::log_session_event(session_id, &record.username, "expired");
            return Err(AppError::session_invalid());
        }

        Ok(record)
    }

    /// Remove the session behind a token. Unknown or badly signed tokens are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store fails
    pub async fn revoke(&self, token: &str) -> AppResult<()> {
        if let Some(session_id) = self.signer.verify(token) {
            if let Some(record) = self.store.remove(session_id).await? {
                AppLogger::log_session_event(session_id, &record.username, "revoked");
            }
        }
        Ok(())
    }

    /// Count of live sessions
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn active_sessions(&self) -> AppResult<usize> {
        self.store.active_count().await
    }

    /// Remove expired sessions now
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn purge_expired(&self) -> AppResult<usize> {
        self.store.purge_expired().await
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

/// 32 bytes from the system CSPRNG, hex encoded
///
/// # Errors
///
/// Returns an error if the system RNG fails
pub fn generate_session_id() -> AppResult<String> {
    use ring::rand::{SecureRandom, SystemRandom};

    let rng = SystemRandom::new();
    let mut bytes = [0u8; session::SESSION_ID_BYTES];
    rng.fill(&mut bytes).map_err(|e| {
        tracing::error!("CRITICAL: Failed to generate session id: {}", e);
        AppError::internal("System RNG failure - cannot generate session id")
    })?;
    Ok(hex::encode(bytes))
}
