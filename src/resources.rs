// ABOUTME: Shared server resources handed to every route group as axum state
// ABOUTME: Owns the configuration, credential store, authenticator and session manager
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use panel_core::errors::AppResult;

use crate::auth::Authenticator;
use crate::config::ServerConfig;
use crate::constants::session;
use crate::credentials::CredentialStore;
use crate::middleware::SessionAuthMiddleware;
use crate::security::SessionSigner;
use crate::session::{InMemorySessionStore, SessionManager, SessionStore};

/// Centralized resource container shared by all handlers
///
/// Every field is cheap to clone; route groups receive an `Arc<ServerResources>`.
#[derive(Clone, Debug)]
pub struct ServerResources {
    /// Startup configuration
    pub config: Arc<ServerConfig>,
    /// Registered users
    pub credentials: Arc<CredentialStore>,
    /// Password verification
    pub authenticator: Authenticator,
    /// Session lifecycle
    pub sessions: SessionManager,
    /// Cookie authentication for handlers
    pub auth_middleware: SessionAuthMiddleware,
    /// Process start time, reported by readiness
    pub started_at: DateTime<Utc>,
}

impl ServerResources {
    /// Assemble resources from already loaded parts and an injected session store
    ///
    /// # Errors
    ///
    /// Returns an error if the dummy hash cannot be created or the session
    /// lifetime is out of range
    pub fn new(
        config: ServerConfig,
        credentials: CredentialStore,
        store: Arc<dyn SessionStore>,
    ) -> AppResult<Self> {
        let credentials = Arc::new(credentials);
        let authenticator =
            Authenticator::new(Arc::clone(&credentials), config.credentials.bcrypt_cost)?;
        let signer = SessionSigner::new(&config.session.secret);
        let sessions = SessionManager::new(store, signer, config.session.ttl_secs)?;

        Ok(Self {
            config: Arc::new(config),
            credentials,
            authenticator,
            auth_middleware: SessionAuthMiddleware::new(sessions.clone()),
            sessions,
            started_at: Utc::now(),
        })
    }

    /// Load the users file and create an in-memory session store with
    /// background purge. Must run inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the users file cannot be loaded or assembly fails
    pub async fn from_config(config: ServerConfig) -> AppResult<Self> {
        let credentials = CredentialStore::load(&config.credentials.users_file).await?;
        if credentials.is_empty() {
            tracing::warn!("Users file is empty, nobody can log in");
        }

        let store = InMemorySessionStore::with_cleanup(Duration::from_secs(
            session::CLEANUP_INTERVAL_SECS,
        ));

        // Authenticator::new runs one bcrypt hash
        tokio::task::spawn_blocking(move || Self::new(config, credentials, Arc::new(store)))
            .await
            .map_err(|e| {
                panel_core::errors::AppError::internal(format!("Resource setup task failed: {e}"))
            })?
    }
}
