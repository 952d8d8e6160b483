//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! AppState holds only gateway-owned concerns:
//! - **TokenProvider** — stateless token issuance/validation (authgate-core)
//! - **UserStore** — lookup-by-username and insert, behind a trait
//! - **AuthService** — login/registration orchestration
//!
//! The user store and password hasher are collaborators: the gateway
//! specifies their interfaces and ships in-memory/Argon2id implementations,
//! but their persistence and policy choices are not this crate's domain.

use std::collections::HashMap;
use std::sync::Arc;

use authgate_core::token::TokenConfigError;
use authgate_core::TokenProvider;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::password::{Argon2PasswordHasher, PasswordHashError, PasswordHasher};
use crate::service::AuthService;

// -- User Store ---------------------------------------------------------------

/// A stored user account.
///
/// Not `Serialize`: responses go through the route-layer DTOs, which carry
/// no password material.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    /// Unique username — the store key and the token subject.
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// PHC-format password hash. Never serialized.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insert failed because the username is already taken.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("username already taken")]
pub struct DuplicateUsername;

/// User persistence collaborator: lookup-by-username and insert.
///
/// Implementations must be safe for concurrent use; `insert` must be an
/// atomic check-and-insert so two concurrent registrations of the same
/// username cannot both succeed.
pub trait UserStore: Send + Sync {
    /// Look up a user by username.
    fn find_by_username(&self, username: &str) -> Option<UserRecord>;

    /// Insert a new user, failing if the username already exists.
    fn insert(&self, user: UserRecord) -> Result<(), DuplicateUsername>;
}

/// Thread-safe, cloneable in-memory user store keyed by username.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    data: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_username(&self, username: &str) -> Option<UserRecord> {
        self.data.read().get(username).cloned()
    }

    fn insert(&self, user: UserRecord) -> Result<(), DuplicateUsername> {
        let mut guard = self.data.write();
        if guard.contains_key(&user.username) {
            return Err(DuplicateUsername);
        }
        guard.insert(user.username.clone(), user);
        Ok(())
    }
}

// -- Application State --------------------------------------------------------

/// Startup failed before the server could bind.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The token provider rejected its configuration.
    #[error("token provider configuration: {0}")]
    Token(#[from] TokenConfigError),
    /// The password hasher could not produce the decoy hash.
    #[error("password hasher initialization: {0}")]
    Hasher(#[from] PasswordHashError),
}

/// Shared application state.
///
/// Cheap to clone: every field is an `Arc` handle or a small config struct.
#[derive(Clone)]
pub struct AppState {
    /// Stateless token issuance and validation.
    pub token_provider: Arc<TokenProvider>,
    /// User persistence collaborator.
    pub users: Arc<dyn UserStore>,
    /// Login/registration orchestration.
    pub auth: AuthService,
    /// Process configuration (secret redacted in Debug).
    pub config: AppConfig,
}

impl AppState {
    /// Build the application state from configuration, with the in-memory
    /// user store and the Argon2id hasher.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError`] on an unusable secret or TTL, or if the
    /// hasher cannot initialize. Fatal: the caller should exit.
    pub fn from_config(config: AppConfig) -> Result<Self, StartupError> {
        let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
        Self::with_collaborators(config, users, hasher)
    }

    /// Build the application state with explicit collaborators.
    pub fn with_collaborators(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Result<Self, StartupError> {
        let token_provider = Arc::new(TokenProvider::new(&config.jwt_secret, config.token_ttl)?);
        let auth = AuthService::new(Arc::clone(&users), hasher)?;
        Ok(Self {
            token_provider,
            users,
            auth,
            config,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("token_provider", &self.token_provider)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
