// ABOUTME: Route module organization for the panel server HTTP endpoints
// ABOUTME: Assembles route groups and applies tracing, limits, CORS and security headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route module for the panel server
//!
//! Each domain module contains only route definitions and thin handlers that
//! authenticate, gate by role and delegate to the resources.

/// Login and logout routes
pub mod auth;
/// Health check and readiness routes
pub mod health;
/// Static frontend routes
pub mod static_files;
/// Identity and users table routes
pub mod users;

pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use static_files::StaticRoutes;
pub use users::UserRoutes;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use panel_core::errors::AppError;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{make_request_span, setup_cors};
use crate::resources::ServerResources;
use crate::security::SecurityHeaders;

/// Build the full application router
///
/// Layers from innermost to outermost: security headers, CORS, body limit,
/// timeout, request id propagation, tracing, request id generation.
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let config = Arc::clone(&resources.config);

    let mut router = Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(AuthRoutes::routes(Arc::clone(&resources)))
        .merge(UserRoutes::routes(resources))
        .merge(StaticRoutes::routes(&config.static_files.directory))
        .fallback(|| async { AppError::not_found("Route") });

    router = SecurityHeaders::for_environment(config.environment).apply(router);

    if let Some(cors) = setup_cors(&config) {
        router = router.layer(cors);
    }

    router
        .layer(RequestBodyLimitLayer::new(config.security.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.security.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
