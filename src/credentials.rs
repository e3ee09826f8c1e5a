// ABOUTME: Credential store mapping usernames to bcrypt hashes and roles
// ABOUTME: Loads and writes the JSON users file produced by the provisioning tool
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Credential Store
//!
//! Read-only, in-memory view of the users file. The file is a JSON array of
//! [`User`] records and is read once at startup; the server never mutates it.

use std::collections::HashMap;
use std::path::Path;

use panel_core::errors::{AppError, AppResult};
use panel_core::models::{User, UserSummary};
use panel_core::permissions::UserRole;
use tracing::{debug, info};
use uuid::Uuid;

/// Username to account lookup
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: Vec<User>,
    by_username: HashMap<String, usize>,
}

impl CredentialStore {
    /// Build a store from already parsed users
    ///
    /// # Errors
    ///
    /// Returns an error if a username is empty or appears twice
    pub fn from_users(users: Vec<User>) -> AppResult<Self> {
        let mut by_username = HashMap::with_capacity(users.len());
        for (index, user) in users.iter().enumerate() {
            if user.username.trim().is_empty() {
                return Err(AppError::invalid_input(format!(
                    "User {} has an empty username",
                    user.id
                )));
            }
            if by_username.insert(user.username.clone(), index).is_some() {
                return Err(AppError::already_exists(format!(
                    "Duplicate username: {}",
                    user.username
                )));
            }
        }
        Ok(Self { users, by_username })
    }

    /// Load the users file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a JSON array of
    /// users, or contains duplicate usernames
    pub async fn load(path: &Path) -> AppResult<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::storage(format!("Cannot read users file {}: {e}", path.display()))
                .with_source(e)
        })?;
        let users: Vec<User> = serde_json::from_str(&raw)?;
        let store = Self::from_users(users)?;

        info!(
            users = store.len(),
            path = %path.display(),
            "Credential store loaded"
        );
        Ok(store)
    }

    /// Exact, case-sensitive username lookup
    #[must_use]
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.by_username
            .get(username)
            .and_then(|&index| self.users.get(index))
    }

    /// Lookup by user id
    #[must_use]
    pub fn find_by_id(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// All users in file order
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Users table as seen by a viewer with the given role and id
    #[must_use]
    pub fn visible_to(&self, role: UserRole, viewer_id: Uuid) -> Vec<UserSummary> {
        let rows: Vec<UserSummary> = self
            .users
            .iter()
            .filter(|user| role.can_view(viewer_id, user))
            .map(UserSummary::from)
            .collect();
        debug!(role = %role, rows = rows.len(), "Users table filtered");
        rows
    }

    /// Number of users
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store has no users
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Write users as a pretty printed JSON array
///
/// # Errors
///
/// Returns an error if serialization or the write fails
pub async fn write_users_file(path: &Path, users: &[User]) -> AppResult<()> {
    let json = serde_json::to_string_pretty(users)?;
    tokio::fs::write(path, json).await.map_err(|e| {
        AppError::storage(format!("Cannot write users file {}: {e}", path.display()))
            .with_source(e)
    })?;
    info!(users = users.len(), path = %path.display(), "Users file written");
    Ok(())
}
