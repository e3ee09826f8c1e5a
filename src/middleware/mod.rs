// ABOUTME: HTTP middleware for authentication, role gating, CORS and tracing
// ABOUTME: Shared by every route group in the panel server
//
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Role guard helpers
pub mod admin_guard;
/// Session cookie authentication
pub mod auth;
/// CORS configuration
pub mod cors;
/// Request spans
pub mod tracing;

pub use admin_guard::{require_admin, require_role};
pub use auth::SessionAuthMiddleware;
pub use cors::setup_cors;
pub use self::tracing::{create_request_span, make_request_span};
