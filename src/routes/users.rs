// ABOUTME: Identity and users-table route handlers gated by session role
// ABOUTME: Admin-only routes return 403 for supervisors and standard users
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User data routes
//!
//! - `GET /api/me`: the caller's own row
//! - `GET /api/users`: rows visible to the caller's role
//! - `GET /api/admin/users`: every row, admin only
//! - `GET /api/admin/sessions`: live session count, admin only

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use panel_core::errors::AppError;
use panel_core::models::UserSummary;
use panel_core::permissions::UserRole;
use serde::{Deserialize, Serialize};

use crate::middleware::require_admin;
use crate::resources::ServerResources;

/// Users table response
#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    /// Visible rows
    pub users: Vec<UserSummary>,
    /// Number of rows returned
    pub total_count: usize,
    /// Role the table was filtered for
    pub viewer_role: UserRole,
}

/// Session statistics response
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatsResponse {
    /// Unexpired sessions in the store
    pub active_sessions: usize,
}

/// User data routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user data routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/me", get(Self::handle_me))
            .route("/api/users", get(Self::handle_users))
            .route("/api/admin/users", get(Self::handle_admin_users))
            .route("/api/admin/sessions", get(Self::handle_admin_sessions))
            .with_state(resources)
    }

    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let session = resources.auth_middleware.authenticate(&headers).await?;

        let user = resources
            .credentials
            .find_by_id(session.user_id)
            .ok_or_else(AppError::session_invalid)?;

        Ok((StatusCode::OK, Json(UserSummary::from(user))).into_response())
    }

    async fn handle_users(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let session = resources.auth_middleware.authenticate(&headers).await?;

        let users = resources
            .credentials
            .visible_to(session.role, session.user_id);

        Ok(users_response(users, session.role))
    }

    async fn handle_admin_users(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let session = resources.auth_middleware.authenticate(&headers).await?;
        require_admin(&session)?;

        tracing::info!(user = %session.username, "Admin listing all users");

        let users = resources
            .credentials
            .users()
            .iter()
            .map(UserSummary::from)
            .collect();

        Ok(users_response(users, session.role))
    }

    async fn handle_admin_sessions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let session = resources.auth_middleware.authenticate(&headers).await?;
        require_admin(&session)?;

        let active_sessions = resources.sessions.active_sessions().await?;

        Ok((StatusCode::OK, Json(SessionStatsResponse { active_sessions })).into_response())
    }
}

fn users_response(users: Vec<UserSummary>, viewer_role: UserRole) -> Response {
    let total_count = users.len();
    (
        StatusCode::OK,
        Json(UsersResponse {
            users,
            total_count,
            viewer_role,
        }),
    )
        .into_response()
}
