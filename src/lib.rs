// ABOUTME: Main library entry point for the panel server
// ABOUTME: Login, cookie sessions and a role-gated admin panel over a small REST API
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Panel Server
//!
//! A small web application with password login, server-side sessions carried
//! in signed cookies, and an admin panel whose tables are filtered by role.
//!
//! ## Architecture
//!
//! - **Credentials**: users file loaded once at startup
//! - **Auth**: bcrypt verification with uniform failures
//! - **Session**: issue, validate, revoke over an injectable store
//! - **Routes**: login/logout, identity, role-gated tables, health, static pages
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use panel_server::config::ServerConfig;
//! use panel_server::resources::ServerResources;
//! use panel_server::server::PanelServer;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = ServerResources::from_config(config).await?;
//!     PanelServer::new(Arc::new(resources)).run().await
//! }
//! ```

/// Password authentication
pub mod auth;

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// Users file and lookup
pub mod credentials;

/// Structured logging setup
pub mod logging;

/// Authentication, role gating, CORS and request spans
pub mod middleware;

/// Users file provisioning
pub mod provisioning;

/// Shared handler state
pub mod resources;

/// HTTP routes
pub mod routes;

/// Cookie signing and security headers
pub mod security;

/// HTTP server lifecycle
pub mod server;

/// Session lifecycle and storage
pub mod session;

pub use panel_core::{errors, models, permissions};
