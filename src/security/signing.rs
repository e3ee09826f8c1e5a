// ABOUTME: HMAC-SHA256 signing of session ids for tamper-evident cookies
// ABOUTME: Token format is "<session_id>.<hex signature>" verified in constant time
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ring::hmac;

use crate::config::SessionSecret;
use crate::constants::session;

/// Signs and verifies session cookie tokens
#[derive(Clone)]
pub struct SessionSigner {
    key: hmac::Key,
}

impl SessionSigner {
    /// Create a signer from the configured secret
    #[must_use]
    pub fn new(secret: &SessionSecret) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes()),
        }
    }

    /// Produce the cookie token for a session id
    #[must_use]
    pub fn sign(&self, session_id: &str) -> String {
        let tag = hmac::sign(&self.key, session_id.as_bytes());
        format!("{session_id}.{}", hex::encode(tag.as_ref()))
    }

    /// Return the session id if the token is well formed and its signature matches
    #[must_use]
    pub fn verify<'a>(&self, token: &'a str) -> Option<&'a str> {
        let (session_id, signature) = token.split_once('.')?;
        if !is_session_id(session_id) {
            return None;
        }
        let signature = hex::decode(signature).ok()?;
        hmac::verify(&self.key, session_id.as_bytes(), &signature).ok()?;
        Some(session_id)
    }
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionSigner { algorithm: HMAC_SHA256 }")
    }
}

/// Lowercase hex of the expected length
fn is_session_id(value: &str) -> bool {
    value.len() == session::SESSION_ID_BYTES * 2
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
