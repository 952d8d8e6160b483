//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI 3.1 spec.
//! Serves at `/openapi.json`, behind authentication like the rest of the
//! non-public surface.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Authgate API",
        version = "0.1.0",
        description = "Stateless token authentication gateway: login and registration endpoints issuing signed bearer tokens, and token-gated protected routes.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::auth::login,
        crate::routes::auth::register,
        crate::routes::users::me,
    ),
    components(schemas(
        // Auth DTOs
        crate::routes::auth::LoginRequest,
        crate::routes::auth::RegisterRequest,
        crate::routes::auth::UserResponse,
        // User DTOs
        crate::routes::users::ProfileResponse,
        crate::auth::Role,
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Credential exchange — login and registration"),
        (name = "users", description = "Authenticated user profile"),
    )
)]
pub struct ApiDoc;

/// Registers the bearer-token security scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_contains_all_routes() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = spec["paths"].as_object().unwrap();
        assert!(paths.contains_key("/login"));
        assert!(paths.contains_key("/register"));
        assert!(paths.contains_key("/v1/me"));
    }

    #[test]
    fn spec_declares_bearer_security_scheme() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let scheme = &spec["components"]["securitySchemes"]["bearer"];
        assert_eq!(scheme["scheme"], "bearer");
    }
}
