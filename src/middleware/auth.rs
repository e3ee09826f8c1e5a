// ABOUTME: Session cookie authentication for API request handlers
// ABOUTME: Resolves the panel_session cookie to a live session or a 401 error
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use http::HeaderMap;
use panel_core::errors::{AppError, AppResult};
use tracing::Span;

use crate::security::cookies;
use crate::session::{Session, SessionManager};

/// Middleware for cookie session authentication
#[derive(Clone, Debug)]
pub struct SessionAuthMiddleware {
    sessions: SessionManager,
}

impl SessionAuthMiddleware {
    /// Create new session auth middleware
    #[must_use]
    pub const fn new(sessions: SessionManager) -> Self {
        Self { sessions }
    }

    /// Authenticate a request from its `Cookie` headers
    ///
    /// # Errors
    ///
    /// Returns `AUTH_REQUIRED` when no session cookie is present and
    /// `SESSION_INVALID` when the cookie does not resolve to a live session
    #[tracing::instrument(
        skip(self, headers),
        fields(user = tracing::field::Empty, role = tracing::field::Empty)
    )]
    pub async fn authenticate(&self, headers: &HeaderMap) -> AppResult<Session> {
        let token = cookies::session_token(headers).ok_or_else(AppError::auth_required)?;
        let session = self.sessions.validate(&token).await?;

        let span = Span::current();
        span.record("user", session.username.as_str());
        span.record("role", session.role.as_str());

        Ok(session)
    }
}
