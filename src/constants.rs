// ABOUTME: System-wide constants and environment defaults for the panel server
// ABOUTME: Groups session, limit, and environment-variable defaults by domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Constants Module
//!
//! Application constants and environment-based configuration values.
//! Hardcoded values live in the domain modules; `env_config` reads overrides.

use std::env;

/// Service identifiers used in logs and health responses
pub mod service_names {
    /// Name reported by the server binary
    pub const PANEL_SERVER: &str = "panel-server";
    /// Name reported by the provisioning binary
    pub const CREATE_USERS: &str = "create-users";
}

/// Session lifetime, cookie and secret sizing
pub mod session {
    /// Cookie carrying the signed session token
    pub const COOKIE_NAME: &str = "panel_session";
    /// Default session lifetime (8 hours)
    pub const DEFAULT_TTL_SECS: u64 = 8 * 60 * 60;
    /// Random bytes in a session id before hex encoding
    pub const SESSION_ID_BYTES: usize = 32;
    /// Minimum accepted length of the decoded session secret
    pub const MIN_SECRET_BYTES: usize = 32;
    /// Interval between purges of expired sessions
    pub const CLEANUP_INTERVAL_SECS: u64 = 300;
    /// Attempts at generating a unique session id before giving up
    pub const MAX_ID_ATTEMPTS: usize = 4;
}

/// Request handling limits
pub mod limits {
    /// Default per-request timeout
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Largest request body accepted (64 KiB)
    pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;
    /// Lowest bcrypt cost accepted by the library
    pub const MIN_BCRYPT_COST: u32 = 4;
    /// Highest bcrypt cost accepted by the library
    pub const MAX_BCRYPT_COST: u32 = 31;
    /// Longest session lifetime accepted (30 days)
    pub const MAX_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;
}

/// Fallback values for configuration
pub mod defaults {
    /// Bind address
    pub const HOST: &str = "127.0.0.1";
    /// Bind port
    pub const HTTP_PORT: u16 = 8000;
    /// Credential store file
    pub const USERS_FILE: &str = "usuarios.json";
    /// Frontend directory
    pub const STATIC_DIR: &str = "static";
    /// bcrypt work factor for provisioning and the dummy hash
    pub const BCRYPT_COST: u32 = 12;
    /// Page served for `/`
    pub const LOGIN_PAGE: &str = "/static/login.html";
}

/// Fixed user-facing messages
pub mod messages {
    /// Successful login
    pub const LOGIN_SUCCESS: &str = "Login successful";
    /// Successful logout
    pub const LOGOUT_SUCCESS: &str = "Logged out";
    /// Role too low for an admin route
    pub const ADMIN_REQUIRED: &str = "Admin role required";
}

/// Environment-based configuration
pub mod env_config {
    use super::{defaults, env, limits, session};

    /// Get bind host from environment or default
    #[must_use]
    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| defaults::HOST.into())
    }

    /// Get `HTTP` port from environment or default
    #[must_use]
    pub fn http_port() -> String {
        env::var("HTTP_PORT").unwrap_or_else(|_| defaults::HTTP_PORT.to_string())
    }

    /// Get deployment environment from `ENV` or `ENVIRONMENT`
    #[must_use]
    pub fn environment() -> String {
        env::var("ENV")
            .or_else(|_| env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "development".into())
    }

    /// Get log level from environment or default
    #[must_use]
    pub fn log_level() -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    }

    /// Get the hex encoded session secret, if configured
    #[must_use]
    pub fn session_secret() -> Option<String> {
        env::var("SESSION_SECRET").ok().filter(|s| !s.trim().is_empty())
    }

    /// Get session lifetime from environment or default
    #[must_use]
    pub fn session_ttl_secs() -> String {
        env::var("SESSION_TTL_SECS").unwrap_or_else(|_| session::DEFAULT_TTL_SECS.to_string())
    }

    /// Get users file path from environment or default
    #[must_use]
    pub fn users_file() -> String {
        env::var("USERS_FILE").unwrap_or_else(|_| defaults::USERS_FILE.into())
    }

    /// Get static directory from environment or default
    #[must_use]
    pub fn static_dir() -> String {
        env::var("STATIC_DIR").unwrap_or_else(|_| defaults::STATIC_DIR.into())
    }

    /// Get bcrypt cost from environment or default
    #[must_use]
    pub fn bcrypt_cost() -> String {
        env::var("BCRYPT_COST").unwrap_or_else(|_| defaults::BCRYPT_COST.to_string())
    }

    /// Get allowed CORS origins from environment, empty means same-origin only
    #[must_use]
    pub fn cors_allowed_origins() -> String {
        env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default()
    }

    /// Get request timeout from environment or default
    #[must_use]
    pub fn request_timeout_secs() -> String {
        env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| limits::DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
    }
}
