// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Builds test configuration, a seeded credential store and logged-in cookies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `panel_server`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use std::path::PathBuf;
use std::sync::{Arc, Once, OnceLock};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use panel_server::{
    config::{
        CredentialsConfig, Environment, LogLevel, SecurityConfig, ServerConfig, SessionConfig,
        SessionSecret, StaticFilesConfig,
    },
    constants::limits,
    credentials::CredentialStore,
    models::User,
    permissions::UserRole,
    resources::ServerResources,
    session::InMemorySessionStore,
};
use tower::ServiceExt;

static INIT_LOGGER: Once = Once::new();

/// Lowest bcrypt cost accepted, keeps the suite fast
pub const TEST_BCRYPT_COST: u32 = 4;

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Frontend directory shipped with the crate
pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Fixed 32 byte secret so tokens are reproducible within a test
pub fn test_secret() -> SessionSecret {
    SessionSecret::from_bytes(vec![0x5a; 32]).expect("32 byte secret")
}

/// Configuration for tests: testing environment, cheap bcrypt, one hour sessions
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_owned(),
        http_port: 0,
        environment: Environment::Testing,
        log_level: LogLevel::Warn,
        session: SessionConfig {
            secret: test_secret(),
            ttl_secs: 3600,
            secret_is_ephemeral: false,
        },
        credentials: CredentialsConfig {
            users_file: PathBuf::from("unused-in-tests.json"),
            bcrypt_cost: TEST_BCRYPT_COST,
        },
        static_files: StaticFilesConfig {
            directory: static_dir(),
        },
        security: SecurityConfig {
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
            max_body_bytes: limits::MAX_REQUEST_BODY_BYTES,
        },
    }
}

/// The three starter accounts hashed at the test cost, computed once per process
pub fn test_users() -> Vec<User> {
    static USERS: OnceLock<Vec<User>> = OnceLock::new();
    USERS
        .get_or_init(|| {
            let hash = |password: &str| {
                bcrypt::hash(password, TEST_BCRYPT_COST).expect("bcrypt hash")
            };
            vec![
                User::new("admin".into(), hash("adminpass"), UserRole::Admin)
                    .with_display_name("Administrador")
                    .with_email("admin@ejemplo.com"),
                User::new("super1".into(), hash("superpass"), UserRole::Supervisor)
                    .with_display_name("Supervisor Uno")
                    .with_email("super1@ejemplo.com"),
                User::new("usuario1".into(), hash("userpass"), UserRole::Standard)
                    .with_display_name("Usuario Uno")
                    .with_email("user1@ejemplo.com"),
            ]
        })
        .clone()
}

/// Credential store holding the starter accounts
pub fn create_test_credentials() -> CredentialStore {
    CredentialStore::from_users(test_users()).expect("unique usernames")
}

/// Resources over an in-memory session store
pub fn create_test_resources() -> Arc<ServerResources> {
    create_test_resources_with(test_config())
}

/// Resources with a caller supplied configuration
pub fn create_test_resources_with(config: ServerConfig) -> Arc<ServerResources> {
    init_test_logging();
    let resources = ServerResources::new(
        config,
        create_test_credentials(),
        Arc::new(InMemorySessionStore::new()),
    )
    .expect("server resources");
    Arc::new(resources)
}

/// POST a JSON login and return the status plus the `name=value` cookie pair
pub async fn login(router: &Router, username: &str, password: &str) -> (StatusCode, Option<String>) {
    let body = serde_json::json!({ "username": username, "password": password });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_owned);
    (status, cookie)
}

/// Log in and return the cookie, panicking on failure
pub async fn login_cookie(router: &Router, username: &str, password: &str) -> String {
    let (status, cookie) = login(router, username, password).await;
    assert_eq!(status, StatusCode::OK, "login failed for {username}");
    cookie.expect("Set-Cookie on successful login")
}

/// GET `uri` with an optional cookie, returning status and parsed JSON body
pub async fn get_json(
    router: &Router,
    uri: &str,
    cookie: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder.body(Body::empty()).expect("request");

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, json)
}
