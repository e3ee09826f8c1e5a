// ABOUTME: Security response headers applied to every route
// ABOUTME: Development and production profiles, HSTS only in production
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Security Headers Middleware
//!
//! Protects the panel pages against XSS, clickjacking and MIME sniffing. The
//! frontend ships no inline scripts, so the CSP allows scripts from `'self'` only.

use axum::Router;
use http::header::{
    CONTENT_SECURITY_POLICY, REFERRER_POLICY, STRICT_TRANSPORT_SECURITY,
    X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
};
use http::{HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::Environment;

const PERMISSIONS_POLICY: HeaderName = HeaderName::from_static("permissions-policy");

/// Security headers configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityHeaders {
    /// Content Security Policy header value
    pub csp: &'static str,
    /// X-Frame-Options header value
    pub frame_options: &'static str,
    /// X-Content-Type-Options header value
    pub content_type_options: &'static str,
    /// Referrer-Policy header value
    pub referrer_policy: &'static str,
    /// Permissions-Policy header value
    pub permissions_policy: &'static str,
    /// Strict-Transport-Security header value (for HTTPS)
    pub hsts: Option<&'static str>,
}

impl SecurityHeaders {
    /// Pick the profile for an environment
    #[must_use]
    pub const fn for_environment(environment: Environment) -> Self {
        if environment.is_production() {
            Self::production()
        } else {
            Self::development()
        }
    }

    /// Development profile, no HSTS since the server runs over plain HTTP
    #[must_use]
    pub const fn development() -> Self {
        Self {
            csp: "default-src 'self'; script-src 'self'; style-src 'self'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'; object-src 'none'; base-uri 'self'; form-action 'self'",
            frame_options: "DENY",
            content_type_options: "nosniff",
            referrer_policy: "strict-origin-when-cross-origin",
            permissions_policy: "geolocation=(), microphone=(), camera=(), payment=(), usb=()",
            hsts: None,
        }
    }

    /// Production profile
    #[must_use]
    pub const fn production() -> Self {
        Self {
            csp: "default-src 'self'; script-src 'self'; style-src 'self'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'; object-src 'none'; base-uri 'self'; form-action 'self'; upgrade-insecure-requests",
            frame_options: "DENY",
            content_type_options: "nosniff",
            referrer_policy: "strict-origin-when-cross-origin",
            permissions_policy: "geolocation=(), microphone=(), camera=(), payment=(), usb=()",
            hsts: Some("max-age=31536000; includeSubDomains"),
        }
    }

    /// Header name and value pairs to set
    #[must_use]
    pub fn to_headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        let mut headers = vec![
            (CONTENT_SECURITY_POLICY, HeaderValue::from_static(self.csp)),
            (X_FRAME_OPTIONS, HeaderValue::from_static(self.frame_options)),
            (
                X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static(self.content_type_options),
            ),
            (REFERRER_POLICY, HeaderValue::from_static(self.referrer_policy)),
            (
                PERMISSIONS_POLICY,
                HeaderValue::from_static(self.permissions_policy),
            ),
        ];
        if let Some(hsts) = self.hsts {
            headers.push((STRICT_TRANSPORT_SECURITY, HeaderValue::from_static(hsts)));
        }
        headers
    }

    /// Wrap a router so every response carries these headers
    #[must_use]
    pub fn apply(&self, router: Router) -> Router {
        self.to_headers()
            .into_iter()
            .fold(router, |router, (name, value)| {
                router.layer(SetResponseHeaderLayer::if_not_present(name, value))
            })
    }
}
