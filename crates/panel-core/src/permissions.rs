// ABOUTME: Ordered user roles for the admin panel and the table visibility rule
// ABOUTME: Admin outranks supervisor, supervisor outranks standard users
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::User;

/// User role, ordered by privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access, including every user row and session statistics
    Admin,
    /// Sees every non-admin user
    Supervisor,
    /// Sees only their own row
    #[serde(alias = "usuario", alias = "user")]
    Standard,
}

impl UserRole {
    /// Numeric privilege level. Higher is more privileged.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Admin => 2,
            Self::Supervisor => 1,
            Self::Standard => 0,
        }
    }

    /// Whether this role meets or exceeds `required`
    #[must_use]
    pub const fn has_at_least(self, required: Self) -> bool {
        self.level() >= required.level()
    }

    /// Canonical lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
            Self::Standard => "standard",
        }
    }

    /// Whether a viewer with this role and id may see `target` in a users table
    #[must_use]
    pub fn can_view(self, viewer_id: Uuid, target: &User) -> bool {
        match self {
            Self::Admin => true,
            Self::Supervisor => target.role != Self::Admin,
            Self::Standard => target.id == viewer_id,
        }
    }
}

impl PartialOrd for UserRole {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UserRole {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.level().cmp(&other.level())
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "supervisor" => Ok(Self::Supervisor),
            "standard" | "usuario" | "user" => Ok(Self::Standard),
            other => Err(AppError::invalid_input(format!("Unknown role: {other}"))),
        }
    }
}
