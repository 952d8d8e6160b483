//! # authgate-api — Axum Authentication Gateway
//!
//! Issues and validates signed bearer tokens for a backend API, gates
//! access to protected routes, and exposes login/registration endpoints.
//! Token creation/validation lives in `authgate-core`; this crate is the
//! HTTP binding around it.
//!
//! ## API Surface
//!
//! | Route                | Module               | Auth     |
//! |----------------------|----------------------|----------|
//! | `POST /login`        | [`routes::auth`]     | public   |
//! | `POST /register`     | [`routes::auth`]     | public   |
//! | `GET /v1/me`         | [`routes::users`]    | bearer   |
//! | `GET /openapi.json`  | [`openapi`]          | bearer   |
//! | `GET /health/*`      | [`app`]              | public   |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → auth_context_middleware → [require_auth] → Handler
//! ```
//!
//! The context middleware runs on every request and only attaches identity;
//! `require_auth` wraps protected routes and produces the 401s.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod password;
pub mod routes;
pub mod service;
pub mod state;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the auth middleware
/// so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    // Public credential exchange.
    let public = routes::auth::router();

    // Everything else requires an authenticated identity.
    let protected = Router::new()
        .merge(routes::users::router())
        .merge(openapi::router())
        .layer(from_fn(auth::require_auth));

    let api = public
        .merge(protected)
        .layer(from_fn_with_state(
            state.clone(),
            auth::auth_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Unauthenticated health probes.
    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
