// ABOUTME: CORS middleware configuration for HTTP API endpoints
// ABOUTME: Same-origin by default, optional wildcard or explicit origin list
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::ServerConfig;

/// Configure CORS from `CORS_ALLOWED_ORIGINS`
///
/// Returns `None` when no origins are configured; the panel is then served
/// same-origin only and no CORS headers are emitted.
///
/// - `*` allows any origin without credentials, so session cookies are not sent
/// - an explicit list allows credentials for exactly those origins
///
/// ```bash
/// export CORS_ALLOWED_ORIGINS="https://panel.example.com,https://ops.example.com"
/// ```
#[must_use]
pub fn setup_cors(config: &ServerConfig) -> Option<CorsLayer> {
    let origins = &config.security.cors_origins;
    if origins.is_empty() {
        return None;
    }

    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.iter().any(|origin| origin == "*") {
        return Some(base.allow_origin(AllowOrigin::any()));
    }

    let list: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if list.is_empty() {
        tracing::warn!("No valid CORS origins configured, falling back to same-origin");
        return None;
    }

    Some(
        base.allow_origin(AllowOrigin::list(list))
            .allow_credentials(true),
    )
}
