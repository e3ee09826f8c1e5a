// ABOUTME: Users file provisioning with bcrypt hashing for the create-users tool
// ABOUTME: Seeds the default accounts or appends a single account
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::Path;

use panel_core::errors::{AppError, AppResult};
use panel_core::models::User;
use panel_core::permissions::UserRole;

use crate::credentials::{write_users_file, CredentialStore};

/// Plaintext account description, hashed before it is stored
#[derive(Clone)]
pub struct NewUser {
    /// Login name
    pub username: String,
    /// Plaintext password
    pub password: String,
    /// Role
    pub role: UserRole,
    /// Display name
    pub display_name: Option<String>,
    /// Contact email
    pub email: Option<String>,
}

impl NewUser {
    /// Hash the password and build the stored record
    ///
    /// # Errors
    ///
    /// Returns an error if a field is empty or hashing fails
    pub fn into_user(self, bcrypt_cost: u32) -> AppResult<User> {
        if self.username.trim().is_empty() {
            return Err(AppError::invalid_input("Username must not be empty"));
        }
        if self.password.is_empty() {
            return Err(AppError::invalid_input("Password must not be empty"));
        }

        let hash = bcrypt::hash(&self.password, bcrypt_cost)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")).with_source(e))?;

        let mut user = User::new(self.username, hash, self.role);
        user.display_name = self.display_name;
        user.email = self.email;
        Ok(user)
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// The three starter accounts
#[must_use]
pub fn default_users() -> Vec<NewUser> {
    vec![
        NewUser {
            username: "admin".into(),
            password: "adminpass".into(),
            role: UserRole::Admin,
            display_name: Some("Administrador".into()),
            email: Some("admin@ejemplo.com".into()),
        },
        NewUser {
            username: "super1".into(),
            password: "superpass".into(),
            role: UserRole::Supervisor,
            display_name: Some("Supervisor Uno".into()),
            email: Some("super1@ejemplo.com".into()),
        },
        NewUser {
            username: "usuario1".into(),
            password: "userpass".into(),
            role: UserRole::Standard,
            display_name: Some("Usuario Uno".into()),
            email: Some("user1@ejemplo.com".into()),
        },
    ]
}

/// Write the default accounts to `path`
///
/// # Errors
///
/// Returns an error if the file exists and `force` is false, or hashing or the
/// write fails
pub async fn seed_users_file(path: &Path, bcrypt_cost: u32, force: bool) -> AppResult<Vec<User>> {
    if !force && tokio::fs::try_exists(path).await? {
        return Err(AppError::already_exists(format!(
            "{} already exists, pass --force to overwrite",
            path.display()
        )));
    }

    let users = tokio::task::spawn_blocking(move || {
        default_users()
            .into_iter()
            .map(|user| user.into_user(bcrypt_cost))
            .collect::<AppResult<Vec<User>>>()
    })
    .await
    .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))??;

    write_users_file(path, &users).await?;
    Ok(users)
}

/// Append one account to `path`, creating the file if needed
///
/// # Errors
///
/// Returns an error if the username is taken, the existing file is invalid,
/// or hashing or the write fails
pub async fn add_user(path: &Path, new_user: NewUser, bcrypt_cost: u32) -> AppResult<User> {
    let existing = if tokio::fs::try_exists(path).await? {
        CredentialStore::load(path).await?.users().to_vec()
    } else {
        Vec::new()
    };

    if existing.iter().any(|user| user.username == new_user.username) {
        return Err(AppError::already_exists(format!(
            "User {} already exists",
            new_user.username
        )));
    }

    let user = tokio::task::spawn_blocking(move || new_user.into_user(bcrypt_cost))
        .await
        .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))??;

    let mut users = existing;
    users.push(user.clone());
    write_users_file(path, &users).await?;
    Ok(user)
}
