// ABOUTME: Security utilities for session cookies and HTTP response hardening
// ABOUTME: Groups cookie signing, cookie parsing and security header profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Session cookie parsing and construction
pub mod cookies;
/// Security response header profiles
pub mod headers;
/// HMAC signing of session tokens
pub mod signing;

pub use headers::SecurityHeaders;
pub use signing::SessionSigner;
