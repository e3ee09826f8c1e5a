// ABOUTME: Integration tests for session issuing, validation, revocation and expiry
// ABOUTME: Covers concurrent issuing, tampered tokens and injected store behavior
//
// SPDX-License-Identifier: MIT OR Apache-2.0
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use panel_server::errors::{AppResult, ErrorCode};
use panel_server::security::SessionSigner;
use panel_server::session::{InMemorySessionStore, Session, SessionManager, SessionStore};

fn manager_with_ttl(ttl_secs: u64) -> (SessionManager, Arc<InMemorySessionStore>) {
    common::init_test_logging();
    let store = Arc::new(InMemorySessionStore::new());
    let signer = SessionSigner::new(&common::test_secret());
    let manager = SessionManager::new(store.clone(), signer, ttl_secs).unwrap();
    (manager, store)
}

fn user(name: &str) -> panel_server::models::User {
    common::test_users()
        .into_iter()
        .find(|u| u.username == name)
        .unwrap()
}

// ============================================================================
// Issue and validate
// ============================================================================

#[tokio::test]
async fn test_issued_session_validates() {
    let (manager, _) = manager_with_ttl(3600);
    let admin = user("admin");

    let issued = manager.issue(&admin).await.unwrap();
    let (session_id, signature) = issued.token.split_once('.').unwrap();
    assert_eq!(session_id, issued.session.session_id);
    assert_eq!(session_id.len(), 64);
    assert_eq!(signature.len(), 64);

    let session = manager.validate(&issued.token).await.unwrap();
    assert_eq!(session.user_id, admin.id);
    assert_eq!(session.username, "admin");
    assert_eq!(session.role, admin.role);
    assert_eq!(
        (session.expires_at - session.created_at).num_seconds(),
        3600
    );
}

#[tokio::test]
async fn test_concurrent_issue_yields_unique_ids() {
    let (manager, store) = manager_with_ttl(3600);
    let standard = user("usuario1");

    let handles: Vec<_> = (0..64)
        .map(|_| {
            let manager = manager.clone();
            let standard = standard.clone();
            tokio::spawn(async move { manager.issue(&standard).await.unwrap() })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let issued = handle.await.unwrap();
        assert!(ids.insert(issued.session.session_id), "duplicate session id");
    }

    assert_eq!(ids.len(), 64);
    assert_eq!(store.active_count().await.unwrap(), 64);
    assert_eq!(manager.active_sessions().await.unwrap(), 64);
}

#[tokio::test]
async fn test_tampered_tokens_rejected() {
    let (manager, _) = manager_with_ttl(3600);
    let issued = manager.issue(&user("admin")).await.unwrap();
    let (session_id, signature) = issued.token.split_once('.').unwrap();

    let other = manager.issue(&user("usuario1")).await.unwrap();
    let other_id = other.session.session_id.clone();

    let candidates = [
        // another live id under this token's signature
        format!("{other_id}.{signature}"),
        // truncated signature
        format!("{session_id}.{}", &signature[..62]),
        // uppercase id
        format!("{}.{signature}", session_id.to_uppercase()),
        session_id.to_owned(),
        String::new(),
        "not-a-token".to_owned(),
    ];

    for token in &candidates {
        let err = manager.validate(token).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionInvalid, "token {token:?} accepted");
    }

    assert!(manager.validate(&issued.token).await.is_ok());
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let (manager, store) = manager_with_ttl(3600);
    let issued = manager.issue(&user("admin")).await.unwrap();

    let other_secret =
        panel_server::config::SessionSecret::from_bytes(vec![0x11; 32]).unwrap();
    let other = SessionManager::new(store, SessionSigner::new(&other_secret), 3600).unwrap();

    let err = other.validate(&issued.token).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SessionInvalid);
}

// ============================================================================
// Revoke and expiry
// ============================================================================

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let (manager, store) = manager_with_ttl(3600);
    let issued = manager.issue(&user("super1")).await.unwrap();

    manager.revoke(&issued.token).await.unwrap();
    manager.revoke(&issued.token).await.unwrap();
    manager.revoke("garbage").await.unwrap();

    assert!(store.get(&issued.session.session_id).await.unwrap().is_none());
    let err = manager.validate(&issued.token).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SessionInvalid);
}

#[tokio::test]
async fn test_zero_ttl_session_is_expired_immediately() {
    let (manager, store) = manager_with_ttl(0);
    let issued = manager.issue(&user("admin")).await.unwrap();

    let err = manager.validate(&issued.token).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SessionInvalid);
    assert!(
        store.get(&issued.session.session_id).await.unwrap().is_none(),
        "expired record removed on validation"
    );
}

#[tokio::test]
async fn test_purge_expired_only_drops_stale_sessions() {
    let store = Arc::new(InMemorySessionStore::new());
    let signer = SessionSigner::new(&common::test_secret());
    let short = SessionManager::new(store.clone(), signer.clone(), 0).unwrap();
    let long = SessionManager::new(store.clone(), signer, 3600).unwrap();

    short.issue(&user("usuario1")).await.unwrap();
    short.issue(&user("super1")).await.unwrap();
    let kept = long.issue(&user("admin")).await.unwrap();

    assert_eq!(long.active_sessions().await.unwrap(), 1);
    assert_eq!(long.purge_expired().await.unwrap(), 2);
    assert!(long.validate(&kept.token).await.is_ok());
}

#[tokio::test]
async fn test_background_cleanup_purges_expired() {
    common::init_test_logging();
    let store = Arc::new(InMemorySessionStore::with_cleanup(Duration::from_millis(20)));
    let signer = SessionSigner::new(&common::test_secret());
    let manager = SessionManager::new(store.clone(), signer, 0).unwrap();

    let issued = manager.issue(&user("admin")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(store.get(&issued.session.session_id).await.unwrap().is_none());
    store.shutdown().await;
}

// ============================================================================
// Injected stores
// ============================================================================

/// Refuses the first `collisions` inserts as if the id were taken
struct CollidingStore {
    inner: InMemorySessionStore,
    collisions: usize,
    attempts: AtomicUsize,
}

#[async_trait::async_trait]
impl SessionStore for CollidingStore {
    async fn insert(&self, session: Session) -> AppResult<bool> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) < self.collisions {
            return Ok(false);
        }
        self.inner.insert(session).await
    }

    async fn get(&self, session_id: &str) -> AppResult<Option<Session>> {
        self.inner.get(session_id).await
    }

    async fn remove(&self, session_id: &str) -> AppResult<Option<Session>> {
        self.inner.remove(session_id).await
    }

    async fn purge_expired(&self) -> AppResult<usize> {
        self.inner.purge_expired().await
    }

    async fn active_count(&self) -> AppResult<usize> {
        self.inner.active_count().await
    }
}

fn colliding_manager(collisions: usize) -> (SessionManager, Arc<CollidingStore>) {
    let store = Arc::new(CollidingStore {
        inner: InMemorySessionStore::new(),
        collisions,
        attempts: AtomicUsize::new(0),
    });
    let signer = SessionSigner::new(&common::test_secret());
    let manager = SessionManager::new(store.clone(), signer, 3600).unwrap();
    (manager, store)
}

#[tokio::test]
async fn test_issue_regenerates_on_id_collision() {
    let (manager, store) = colliding_manager(2);

    let issued = manager.issue(&user("admin")).await.unwrap();
    assert_eq!(store.attempts.load(Ordering::SeqCst), 3);
    assert!(manager.validate(&issued.token).await.is_ok());
}

#[tokio::test]
async fn test_issue_gives_up_after_repeated_collisions() {
    let (manager, _) = colliding_manager(usize::MAX);

    let err = manager.issue(&user("admin")).await.unwrap_err();
    assert!(err.code.is_server_error());
}
