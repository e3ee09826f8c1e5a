// ABOUTME: Login and logout route handlers issuing and revoking session cookies
// ABOUTME: Served at both the bare paths and under /api for the frontend
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication routes
//!
//! `POST /login` verifies credentials and sets the session cookie.
//! `POST /logout` revokes the session and expires the cookie; it succeeds
//! whether or not a session was present.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header::SET_COOKIE, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use panel_core::errors::AppError;
use panel_core::permissions::UserRole;
use serde::{Deserialize, Serialize};

use crate::constants::messages;
use crate::resources::ServerResources;
use crate::security::cookies;

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Plaintext password
    #[serde(default)]
    pub password: String,
}

/// Login response body
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Human readable status
    pub message: String,
    /// Role of the authenticated user
    pub role: UserRole,
    /// Login name
    pub username: String,
    /// Session expiry
    pub expires_at: DateTime<Utc>,
}

/// Logout response body
#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Human readable status
    pub message: String,
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/login", post(Self::handle_login))
            .route("/api/login", post(Self::handle_login))
            .route("/logout", post(Self::handle_logout))
            .route("/api/logout", post(Self::handle_logout))
            .with_state(resources)
    }

    /// Handle login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<LoginRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(request) =
            payload.map_err(|e| AppError::invalid_input(format!("Invalid login body: {e}")))?;

        tracing::debug!(user.name = %request.username, "Login attempt");

        let user = resources
            .authenticator
            .authenticate(&request.username, &request.password)
            .await?;
        let issued = resources.sessions.issue(&user).await?;

        let cookie = cookies::session_cookie(
            &issued.token,
            resources.sessions.ttl_secs(),
            resources.config.secure_cookies(),
        )?;

        Ok((
            StatusCode::OK,
            [(SET_COOKIE, cookie)],
            Json(LoginResponse {
                message: messages::LOGIN_SUCCESS.to_owned(),
                role: user.role,
                username: user.username,
                expires_at: issued.session.expires_at,
            }),
        )
            .into_response())
    }

    /// Handle logout
    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        if let Some(token) = cookies::session_token(&headers) {
            resources.sessions.revoke(&token).await?;
        }

        Ok((
            StatusCode::OK,
            [(
                SET_COOKIE,
                cookies::clear_session_cookie(resources.config.secure_cookies()),
            )],
            Json(LogoutResponse {
                message: messages::LOGOUT_SUCCESS.to_owned(),
            }),
        )
            .into_response())
    }
}
