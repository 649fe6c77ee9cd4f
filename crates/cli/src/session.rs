//! Admin session guard.
//!
//! Administrative commands require a verified [`Session`]; handlers take it
//! by value so an unauthenticated path cannot reach them.

use sha2::{Digest, Sha256};

const DEFAULT_USER: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin123";

/// Proof that admin credentials were verified, carrying the acting user.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
}

/// Expected admin credentials, password stored as a SHA-256 hex digest.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    password_hash: String,
}

impl AdminCredentials {
    /// Read `ADMIN_USER` / `ADMIN_PASSWORD`, falling back to the built-in
    /// development defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let username = std::env::var("ADMIN_USER").unwrap_or_else(|_| DEFAULT_USER.to_owned());
        let password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_PASSWORD.to_owned());
        Self::new(username, &password)
    }

    #[must_use]
    pub fn new(username: String, password: &str) -> Self {
        Self {
            username,
            password_hash: hash_password(password),
        }
    }

    /// Check a candidate pair; a match opens a [`Session`].
    #[must_use]
    pub fn verify(&self, username: &str, password: &str) -> Option<Session> {
        if username == self.username && hash_password(password) == self.password_hash {
            Some(Session {
                username: username.to_owned(),
            })
        } else {
            None
        }
    }
}

fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
