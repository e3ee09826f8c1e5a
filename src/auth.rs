// ABOUTME: Password authentication against the credential store using bcrypt
// ABOUTME: Unknown users are verified against a dummy hash so timing does not reveal them
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Authentication
//!
//! [`Authenticator::authenticate`] is the only place a plaintext password is
//! handled. Every failure mode visible to the caller is the same
//! `AUTH_INVALID` error; a corrupt stored hash is reported as an internal error.

use std::sync::Arc;

use panel_core::errors::{AppError, AppResult};
use panel_core::models::User;
use zeroize::Zeroizing;

use crate::credentials::CredentialStore;
use crate::logging::AppLogger;

/// Verifies username and password pairs
#[derive(Clone)]
pub struct Authenticator {
    credentials: Arc<CredentialStore>,
    dummy_hash: Arc<str>,
}

impl Authenticator {
    /// Create an authenticator. Hashes a random dummy password at `bcrypt_cost`,
    /// which blocks for one bcrypt round.
    ///
    /// # Errors
    ///
    /// Returns an error if the RNG fails or the cost is out of range
    pub fn new(credentials: Arc<CredentialStore>, bcrypt_cost: u32) -> AppResult<Self> {
        use ring::rand::{SecureRandom, SystemRandom};

        let mut seed = Zeroizing::new([0u8; 16]);
        SystemRandom::new()
            .fill(&mut seed[..])
            .map_err(|_| AppError::internal("System RNG failure - cannot seed dummy hash"))?;

        let dummy_hash = bcrypt::hash(hex::encode(&seed[..]), bcrypt_cost).map_err(|e| {
            AppError::config_invalid(format!("Cannot create dummy hash: {e}")).with_source(e)
        })?;

        Ok(Self {
            credentials,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    /// Credential store backing this authenticator
    #[must_use]
    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Check a username and password, returning the matching user
    ///
    /// # Errors
    ///
    /// Returns `AUTH_INVALID` for an empty field, an unknown user or a wrong
    /// password, and `INTERNAL_ERROR` if the stored hash is malformed or the
    /// verification task fails
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        if username.is_empty() || password.is_empty() {
            AppLogger::log_auth_event(username, "login", false, Some("empty credentials"));
            return Err(AppError::auth_invalid());
        }

        let user = self.credentials.find_by_username(username).cloned();
        let hash = user
            .as_ref()
            .map_or_else(|| Arc::clone(&self.dummy_hash), |u| Arc::from(u.password_hash.as_str()));

        let password = Zeroizing::new(password.to_owned());
        let is_valid = tokio::task::spawn_blocking(move || bcrypt::verify(password.as_bytes(), &hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
            .map_err(|e| {
                tracing::error!(user.name = %username, "Stored password hash is malformed");
                AppError::internal(format!("Password verification error: {e}")).with_source(e)
            })?;

        match user {
            Some(user) if is_valid => {
                AppLogger::log_auth_event(username, "login", true, Some(user.role.as_str()));
                Ok(user)
            }
            Some(_) => {
                AppLogger::log_auth_event(username, "login", false, Some("wrong password"));
                Err(AppError::auth_invalid())
            }
            None => {
                AppLogger::log_auth_event(username, "login", false, Some("unknown user"));
                Err(AppError::auth_invalid())
            }
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("users", &self.credentials.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_core::errors::ErrorCode;
    use panel_core::permissions::UserRole;

    fn authenticator() -> Authenticator {
        let users = vec![
            User::new(
                "admin".into(),
                bcrypt::hash("adminpass", 4).unwrap(),
                UserRole::Admin,
            ),
            User::new("broken".into(), "not-a-hash".into(), UserRole::Standard),
        ];
        let store = CredentialStore::from_users(users).unwrap();
        Authenticator::new(Arc::new(store), 4).unwrap()
    }

    #[tokio::test]
    async fn test_correct_password() {
        let user = authenticator()
            .authenticate("admin", "adminpass")
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_failures_are_uniform() {
        let auth = authenticator();
        let wrong = auth.authenticate("admin", "wrongpass").await.unwrap_err();
        let unknown = auth.authenticate("ghost", "adminpass").await.unwrap_err();
        let empty = auth.authenticate("admin", "").await.unwrap_err();

        for error in [&wrong, &unknown, &empty] {
            assert_eq!(error.code, ErrorCode::AuthInvalid);
            assert_eq!(error.message, wrong.message);
        }
    }

    #[tokio::test]
    async fn test_malformed_hash_is_internal() {
        let error = authenticator()
            .authenticate("broken", "anything")
            .await
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::InternalError);
    }
}
