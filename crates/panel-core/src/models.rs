// ABOUTME: User account model as stored in the users file and its API projection
// ABOUTME: The password hash never leaves the server through UserSummary
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::permissions::UserRole;

/// Registered user account
///
/// Loaded from the users file at startup and immutable while the server runs.
/// Older files written by the setup script use `password` and `nombre`, which
/// are accepted as aliases.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Login name, unique across the store
    pub username: String,
    /// bcrypt hash of the password
    #[serde(alias = "password")]
    pub password_hash: String,
    /// Human readable name shown in the panel
    #[serde(default, alias = "nombre")]
    pub display_name: Option<String>,
    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
    /// Role used for route gating and table filtering
    pub role: UserRole,
}

impl User {
    /// Create a new user with a fresh id
    #[must_use]
    pub fn new(username: String, password_hash: String, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            display_name: None,
            email: None,
            role,
        }
    }

    /// Set the display name
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Set the email
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish()
    }
}

/// User row as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Unique user identifier
    pub id: Uuid,
    /// Login name
    pub username: String,
    /// Human readable name
    pub display_name: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Role
    pub role: UserRole,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
