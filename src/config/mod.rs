// ABOUTME: Configuration module for centralized server settings
// ABOUTME: Re-exports the environment-driven ServerConfig and its parts
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration module for the panel server
//!
//! All settings come from environment variables (optionally via `.env`), see
//! [`environment::ServerConfig::from_env`]. The binaries layer CLI overrides on top.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    CredentialsConfig, Environment, LogLevel, SecurityConfig, ServerConfig, SessionConfig,
    SessionSecret, StaticFilesConfig,
};
