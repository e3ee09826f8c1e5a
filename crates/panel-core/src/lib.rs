// ABOUTME: Core types for the panel server
// ABOUTME: Foundation crate with error handling, the user model and roles
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Panel Core
//!
//! Shared types for the panel server. This crate changes rarely, so the
//! server crate gets incremental compilation benefits from the split.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode` and the JSON error body
//! - **models**: `User` as stored on disk and `UserSummary` as served
//! - **permissions**: ordered `UserRole` and the table visibility rule

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// User account model
pub mod models;

/// Role ordering and visibility
pub mod permissions;
