//! # Authentication Service
//!
//! Orchestrates login and registration against the user store and password
//! hasher collaborators. Returns domain user records; the route layer
//! attaches tokens and shapes responses.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::error::AppError;
use crate::password::{PasswordHashError, PasswordHasher};
use crate::state::{UserRecord, UserStore};

/// Fixed input for the decoy hash computed at startup. The decoy is
/// verified against when a login names an unknown user, so the unknown-user
/// and wrong-password paths cost the same hashing work.
const DECOY_PASSWORD: &str = "authgate-decoy-password";

/// Registration input: credentials plus profile fields.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Login/registration failure.
#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Unknown username or wrong password — indistinguishable by design.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Registration named a username that already exists.
    #[error("username already taken")]
    UsernameTaken,
    /// The password hasher failed (server-side fault).
    #[error(transparent)]
    Hasher(#[from] PasswordHashError),
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials => {
                Self::Unauthorized("invalid credentials".to_string())
            }
            AuthServiceError::UsernameTaken => Self::Conflict("username already taken".to_string()),
            AuthServiceError::Hasher(inner) => Self::Internal(inner.to_string()),
        }
    }
}

/// Login and registration orchestration over the store and hasher.
///
/// Cloneable handle; both collaborators are shared `Arc`s.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    /// Pre-computed hash verified against when the username is unknown.
    decoy_hash: String,
}

impl AuthService {
    /// Build the service, pre-computing the decoy hash.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] if the hasher cannot produce the decoy
    /// hash. Fatal at startup.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Result<Self, PasswordHashError> {
        let decoy_hash = hasher.hash(DECOY_PASSWORD)?;
        Ok(Self {
            users,
            hasher,
            decoy_hash,
        })
    }

    /// Authenticate a username/password pair.
    ///
    /// Unknown username and wrong password take the same code path through
    /// the hasher and produce the same error, so the response neither
    /// enumerates usernames nor varies measurably in hashing work.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::InvalidCredentials`] on any mismatch.
    pub fn login(&self, username: &str, password: &str) -> Result<UserRecord, AuthServiceError> {
        let user = self.users.find_by_username(username);
        let hash = user
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(&self.decoy_hash);
        let verified = self.hasher.verify(password, hash);

        match user {
            Some(user) if verified => {
                tracing::info!(username = %user.username, "login succeeded");
                Ok(user)
            }
            _ => {
                tracing::warn!(username, "login failed");
                Err(AuthServiceError::InvalidCredentials)
            }
        }
    }

    /// Register a new user: hash the password, insert atomically.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::UsernameTaken`] on a duplicate username
    /// and propagates hasher failures.
    pub fn register(&self, registration: Registration) -> Result<UserRecord, AuthServiceError> {
        let password_hash = self.hasher.hash(&registration.password)?;
        let record = UserRecord {
            id: Uuid::new_v4(),
            username: registration.username,
            first_name: registration.first_name,
            last_name: registration.last_name,
            password_hash,
            created_at: Utc::now(),
        };

        self.users
            .insert(record.clone())
            .map_err(|_| AuthServiceError::UsernameTaken)?;

        tracing::info!(username = %record.username, "user registered");
        Ok(record)
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}
