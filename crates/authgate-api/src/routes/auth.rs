//! # Credential Exchange API
//!
//! Public endpoints that trade credentials for signed bearer tokens:
//!
//! - **POST `/login`** — authenticate an existing user
//! - **POST `/register`** — create a user and log them in
//!
//! Both respond with the user's profile plus a token; every failure maps to
//! the uniform error envelope with no hint about which input was wrong.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::service::Registration;
use crate::state::{AppState, UserRecord};

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Login credentials.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username to authenticate as.
    pub username: String,
    /// Plaintext password (hashed server-side, never stored or logged).
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("username must not be empty".to_string());
        }
        if self.username.len() > 64 {
            return Err("username must not exceed 64 characters".to_string());
        }
        if self.password.is_empty() {
            return Err("password must not be empty".to_string());
        }
        if self.password.len() > 1024 {
            return Err("password must not exceed 1024 characters".to_string());
        }
        Ok(())
    }
}

/// Registration data: credentials plus profile fields.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Desired unique username.
    pub username: String,
    /// Plaintext password (hashed server-side).
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("username must not be empty".to_string());
        }
        if self.username.len() > 64 {
            return Err("username must not exceed 64 characters".to_string());
        }
        if self.username.chars().any(char::is_whitespace) {
            return Err("username must not contain whitespace".to_string());
        }
        if self.password.len() < 8 {
            return Err("password must be at least 8 characters".to_string());
        }
        if self.password.len() > 1024 {
            return Err("password must not exceed 1024 characters".to_string());
        }
        if self.first_name.trim().is_empty() || self.first_name.len() > 100 {
            return Err("first_name must be 1-100 characters".to_string());
        }
        if self.last_name.trim().is_empty() || self.last_name.len() > 100 {
            return Err("last_name must be 1-100 characters".to_string());
        }
        Ok(())
    }
}

/// Authenticated user response: profile fields plus a bearer token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Signed bearer token for subsequent requests.
    pub token: String,
}

impl UserResponse {
    fn from_record(record: UserRecord, token: String) -> Self {
        Self {
            id: record.id,
            username: record.username,
            first_name: record.first_name,
            last_name: record.last_name,
            token,
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the credential-exchange router. Mounted outside `require_auth`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /login — authenticate and issue a token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = UserResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let user = state.auth.login(&req.username, &req.password)?;
    let token = state.token_provider.create_token(&user.username)?;
    Ok(Json(UserResponse::from_record(user, token)))
}

/// POST /register — create a user and issue a token.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 409, description = "Username already taken", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let user = state.auth.register(Registration {
        username: req.username,
        password: req.password,
        first_name: req.first_name,
        last_name: req.last_name,
    })?;
    let token = state.token_provider.create_token(&user.username)?;
    Ok(Json(UserResponse::from_record(user, token)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
