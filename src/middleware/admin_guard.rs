// ABOUTME: Role guard for routes restricted to a minimum role
// ABOUTME: Returns 403 Forbidden when the session role is below the requirement
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role Authorization Guard
//!
//! Handlers authenticate first, then call [`require_role`] or [`require_admin`]
//! with the resolved session instead of comparing roles inline.

use panel_core::errors::{AppError, AppResult};
use panel_core::permissions::UserRole;

use crate::constants::messages;
use crate::logging::AppLogger;
use crate::session::Session;

/// Require `session` to hold at least `required`
///
/// # Errors
///
/// Returns `PERMISSION_DENIED` (403) if the role is insufficient
pub fn require_role(session: &Session, required: UserRole) -> AppResult<()> {
    if session.role.has_at_least(required) {
        return Ok(());
    }

    AppLogger::log_security_event(
        "permission_denied",
        "low",
        &format!("role {} below required {}", session.role, required),
        Some(&session.username),
    );

    Err(if required == UserRole::Admin {
        AppError::permission_denied(messages::ADMIN_REQUIRED)
    } else {
        AppError::permission_denied(format!("{required} role required"))
    })
}

/// Require admin privileges
///
/// # Errors
///
/// Returns `PERMISSION_DENIED` (403) unless the session role is admin
pub fn require_admin(session: &Session) -> AppResult<()> {
    require_role(session, UserRole::Admin)
}
