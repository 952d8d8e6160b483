//! # Authentication Filter & Request Context
//!
//! Bearer-token authentication in two layers, mirroring a security filter
//! chain:
//!
//! 1. [`auth_context_middleware`] — the authentication filter. Runs on every
//!    request, extracts a bearer token from the `Authorization` header, and
//!    on successful validation attaches an [`AuthenticatedUser`] to the
//!    request extensions. It **never rejects**: an absent or invalid token
//!    just leaves the request unauthenticated, because unauthenticated
//!    requests are still legal on public routes.
//!
//! 2. [`require_auth`] — the entry point. Layered onto protected routes
//!    only; responds 401 when no [`AuthenticatedUser`] is present. The 401
//!    body is uniform — it does not reveal whether a token was absent,
//!    malformed, forged, or expired.
//!
//! Handlers extract the identity via the `FromRequestParts` impl.

use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody, ErrorDetail};
use crate::state::AppState;

// ── Role ────────────────────────────────────────────────────────────────────

/// Granted authority of an authenticated caller.
///
/// The gateway grants a single fixed authority; the enum exists so the
/// request context has an explicit authorities marker rather than an
/// implicit "authenticated means everything".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Standard authenticated user.
    User,
}

impl Role {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
        }
    }
}

// ── AuthenticatedUser ───────────────────────────────────────────────────────

/// Identity of the authenticated caller, bound to the request lifetime.
///
/// Created by the authentication filter if and only if the request carried
/// a valid bearer token; dropped when the request completes. Never shared
/// across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The verified token subject.
    pub username: String,
    /// Granted authority.
    pub role: Role,
}

/// Extracts the identity the authentication filter injected into extensions.
///
/// Returns 401 if no identity is present (no valid token on the request).
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("authentication required".into()))
    }
}

// ── Middleware ──────────────────────────────────────────────────────────────

/// Pull a bearer token out of the `Authorization` header, if any.
///
/// A non-Bearer scheme is treated the same as no header: the request
/// proceeds unauthenticated.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// The authentication filter: validate a bearer token and attach the
/// caller's identity to the request.
///
/// Invoked once per inbound request, before route authorization. Mutates
/// only the per-request extensions; validation itself is side-effect free.
/// Invalid tokens are logged at `warn` and discarded — rejection is the
/// job of [`require_auth`] on protected routes.
pub async fn auth_context_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match state.token_provider.validate_token(token) {
            Ok(username) => {
                request.extensions_mut().insert(AuthenticatedUser {
                    username,
                    role: Role::User,
                });
            }
            Err(reason) => {
                tracing::warn!(%reason, "discarding invalid bearer token");
            }
        }
    }
    next.run(request).await
}

/// The entry point: reject requests that reached a protected route without
/// an authenticated identity.
pub async fn require_auth(request: Request, next: Next) -> Response {
    if request.extensions().get::<AuthenticatedUser>().is_none() {
        return unauthorized_response();
    }
    next.run(request).await
}

/// Uniform 401 for every unauthenticated access to a protected route.
fn unauthorized_response() -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: "authentication required".to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::{from_fn, from_fn_with_state};
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::from_config(AppConfig::for_tests("middleware-secret")).unwrap()
    }

    /// Router with a public route and a protected route behind the two
    /// auth layers, as `app()` assembles them.
    fn test_app(state: &AppState) -> Router {
        let protected = Router::new()
            .route(
                "/protected",
                get(|user: AuthenticatedUser| async move { user.username }),
            )
            .layer(from_fn(require_auth));

        Router::new()
            .route("/public", get(|| async { "public" }))
            .merge(protected)
            .layer(from_fn_with_state(state.clone(), auth_context_middleware))
    }

    async fn get_with_auth(app: Router, uri: &str, auth: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = auth {
            builder = builder.header("Authorization", value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_token_reaches_protected_route() {
        let state = test_state();
        let token = state.token_provider.create_token("alice").unwrap();
        let app = test_app(&state);

        let (status, body) =
            get_with_auth(app, "/protected", Some(&format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "alice");
    }

    #[tokio::test]
    async fn missing_header_rejected_on_protected_route() {
        let state = test_state();
        let app = test_app(&state);

        let (status, body) = get_with_auth(app, "/protected", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let err: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(err["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn garbage_token_rejected_not_500() {
        let state = test_state();
        let app = test_app(&state);

        let (status, _) =
            get_with_auth(app, "/protected", Some("Bearer total-garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn forged_token_rejected() {
        let state = test_state();
        let other = AppState::from_config(AppConfig::for_tests("another-secret")).unwrap();
        let forged = other.token_provider.create_token("alice").unwrap();
        let app = test_app(&state);

        let (status, _) =
            get_with_auth(app, "/protected", Some(&format!("Bearer {forged}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejection_body_is_uniform() {
        let state = test_state();

        let (_, absent) = get_with_auth(test_app(&state), "/protected", None).await;
        let (_, garbage) =
            get_with_auth(test_app(&state), "/protected", Some("Bearer junk")).await;
        let (_, wrong_scheme) =
            get_with_auth(test_app(&state), "/protected", Some("Basic dXNlcjpwYXNz")).await;

        // Absent, malformed, and non-Bearer all produce the identical body.
        assert_eq!(absent, garbage);
        assert_eq!(absent, wrong_scheme);
    }

    #[tokio::test]
    async fn public_route_ignores_missing_token() {
        let state = test_state();
        let (status, body) = get_with_auth(test_app(&state), "/public", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "public");
    }

    #[tokio::test]
    async fn public_route_ignores_invalid_token() {
        let state = test_state();
        let (status, _) =
            get_with_auth(test_app(&state), "/public", Some("Bearer nonsense")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn extractor_alone_rejects_unauthenticated() {
        // Even without the require_auth layer, the FromRequestParts impl
        // refuses to produce an identity.
        let state = test_state();
        let app = Router::new()
            .route(
                "/handler-extracted",
                get(|user: AuthenticatedUser| async move { user.username }),
            )
            .layer(from_fn_with_state(state, auth_context_middleware));

        let (status, _) = get_with_auth(app, "/handler-extracted", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn role_as_str() {
        assert_eq!(Role::User.as_str(), "user");
    }

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
