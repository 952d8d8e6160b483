//! # Password Hashing Collaborator
//!
//! The gateway treats password hashing as an external collaborator behind
//! the [`PasswordHasher`] trait. The shipped implementation uses Argon2id
//! with the crate's default parameters, producing PHC-format hash strings.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;
use thiserror::Error;

/// Password hashing failed.
#[derive(Debug, Error)]
#[error("failed to hash password: {0}")]
pub struct PasswordHashError(String);

/// Hashes and verifies passwords.
///
/// Implementations must be safe for concurrent use from request handlers.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing hash string.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Verify a plaintext password against a stored hash string.
    ///
    /// An unparseable hash verifies as `false` rather than erroring — the
    /// caller treats it identically to a wrong password.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id implementation of [`PasswordHasher`].
#[derive(Debug, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_succeeds() {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash("correct horse battery staple").unwrap();
        assert!(hasher.verify("correct horse battery staple", &hash));
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash("correct horse battery staple").unwrap();
        assert!(!hasher.verify("incorrect horse", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = Argon2PasswordHasher;
        let a = hasher.hash("same password").unwrap();
        let b = hasher.hash("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_phc_format_without_plaintext() {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash("hunter2hunter2").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("hunter2"));
    }

    #[test]
    fn unparseable_hash_verifies_false() {
        let hasher = Argon2PasswordHasher;
        assert!(!hasher.verify("anything", "not-a-phc-string"));
        assert!(!hasher.verify("anything", ""));
    }
}
