//! # User Profile API
//!
//! Protected routes resolving the authenticated caller's own record.
//! Mounted behind `require_auth`; handlers additionally extract
//! [`AuthenticatedUser`], so the identity is always present and verified.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AuthenticatedUser, Role};
use crate::error::AppError;
use crate::state::AppState;

/// The caller's own profile. No token echo, no password material.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Granted authority for this request.
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Build the user-profile router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/me", get(me))
}

/// GET /v1/me — resolve the authenticated caller's profile.
///
/// A valid token whose subject no longer exists in the store yields 404:
/// tokens are stateless, so deletion does not revoke them.
#[utoipa::path(
    get,
    path = "/v1/me",
    responses(
        (status = 200, description = "Caller profile", body = ProfileResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
        (status = 404, description = "Subject no longer exists", body = crate::error::ErrorBody),
    ),
    security(("bearer" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let record = state
        .users
        .find_by_username(&user.username)
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(Json(ProfileResponse {
        id: record.id,
        username: record.username,
        first_name: record.first_name,
        last_name: record.last_name,
        role: user.role,
        created_at: record.created_at,
    }))
}
