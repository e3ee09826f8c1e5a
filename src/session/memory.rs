// ABOUTME: In-memory session store behind a tokio RwLock
// ABOUTME: Optional background task purges expired sessions on an interval
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use panel_core::errors::AppResult;
use tokio::sync::RwLock;

use super::{Session, SessionStore};

/// Session store held in process memory
///
/// Uses `Arc<RwLock<HashMap>>` so the optional cleanup task can share the map.
/// Sessions do not survive a restart.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    shutdown_tx: Option<Arc<tokio::sync::mpsc::Sender<()>>>,
}

impl InMemorySessionStore {
    /// Create a store without background cleanup
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that purges expired sessions every `interval`
    ///
    /// Must be called inside a tokio runtime. The task stops once every clone
    /// of the store is dropped.
    #[must_use]
    pub fn with_cleanup(interval: Duration) -> Self {
        let sessions = Arc::new(RwLock::new(HashMap::new()));
        let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);
        let sessions_clone = Arc::clone(&sessions);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        Self::remove_expired(&sessions_clone).await;
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::debug!("Session cleanup task received shutdown signal");
                        break;
                    }
                }
            }
        });

        Self {
            sessions,
            shutdown_tx: Some(Arc::new(shutdown_tx)),
        }
    }

    /// Stop the background cleanup task, if any
    pub async fn shutdown(&self) {
        if let Some(tx) = &self.shutdown_tx {
            let _ = tx.send(()).await;
        }
    }

    async fn remove_expired(sessions: &RwLock<HashMap<String, Session>>) -> usize {
        let now = Utc::now();
        let mut guard = sessions.write().await;
        let before = guard.len();
        guard.retain(|_, session| !session.is_expired_at(now));
        let removed = before - guard.len();
        drop(guard);

        if removed > 0 {
            tracing::debug!("Purged {} expired sessions", removed);
        }
        removed
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Session) -> AppResult<bool> {
        let mut guard = self.sessions.write().await;
        let inserted = match guard.entry(session.session_id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(session);
                true
            }
        };
        drop(guard);
        Ok(inserted)
    }

    async fn get(&self, session_id: &str) -> AppResult<Option<Session>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn remove(&self, session_id: &str) -> AppResult<Option<Session>> {
        Ok(self.sessions.write().await.remove(session_id))
    }

    async fn purge_expired(&self) -> AppResult<usize> {
        Ok(Self::remove_expired(&self.sessions).await)
    }

    async fn active_count(&self) -> AppResult<usize> {
        let now = Utc::now();
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .filter(|session| !session.is_expired_at(now))
            .count())
    }
}
