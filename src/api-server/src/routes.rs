//! Route definitions for the API server
//!
//! Every user route carries its own permission gate. Health, metrics and
//! the OpenAPI document are open.

use crate::{
    handlers,
    middleware::{self, PermissionGate},
    state::AppState,
};
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post, MethodRouter},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use userdir_core::Permission;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Directory API",
        description = "User records gated by role permissions and group-based management"
    ),
    paths(
        handlers::health_check,
        handlers::metrics,
        handlers::create_user,
        handlers::list_users,
        handlers::managed_users,
        handlers::update_user,
        handlers::delete_user,
    ),
    components(
        schemas(
            crate::models::CreateUserRequest,
            crate::models::UpdateUserRequest,
            crate::models::UserResponse,
            crate::models::HealthResponse,
            crate::models::ErrorResponse,
        )
    ),
    modifiers(&ActorIdScheme),
    tags(
        (name = "health", description = "Health and monitoring endpoints"),
        (name = "users", description = "User management endpoints"),
    )
)]
pub struct ApiDoc;

/// Declares the `Authorization` header that carries the acting user's id
struct ActorIdScheme;

impl Modify for ActorIdScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "actor_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
            );
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Wrap a method router in the permission guard for `required`
fn guarded(
    state: &AppState,
    required: Option<Permission>,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    let gate = PermissionGate::new(state.guard.clone(), required);
    route.route_layer(axum_middleware::from_fn_with_state(
        gate,
        middleware::permission_guard,
    ))
}

/// Create the application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(
            "/users",
            guarded(&state, Some(Permission::CREATE), post(handlers::create_user)),
        )
        .route(
            "/users",
            guarded(&state, Some(Permission::VIEW), get(handlers::list_users)),
        )
        .route(
            "/users/managed/:id",
            guarded(&state, None, get(handlers::managed_users)),
        )
        .route(
            "/users/:id",
            guarded(&state, Some(Permission::EDIT), patch(handlers::update_user)),
        )
        .route(
            "/users/:id",
            guarded(&state, Some(Permission::DELETE), delete(handlers::delete_user)),
        );

    Router::new()
        // Health and metrics (no actor required)
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(user_routes)
        .with_state(state)
        // Add middleware layers (executed bottom to top)
        .layer(axum_middleware::from_fn(middleware::error_handling_middleware))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::cors_layer())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use userdir_authz::{EngineConfig, SeedData};

    fn create_test_state() -> AppState {
        AppState::from_seed(EngineConfig::default(), SeedData::builtin()).unwrap()
    }

    async fn status_of(uri: &str) -> StatusCode {
        create_router(create_test_state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(status_of("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        assert_eq!(status_of("/metrics").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_openapi_json() {
        assert_eq!(status_of("/api-docs/openapi.json").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_actor_required_for_user_routes() {
        assert_eq!(status_of("/users").await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_managed_route_is_open() {
        assert_eq!(status_of("/users/managed/1").await, StatusCode::OK);
    }

    #[test]
    fn test_openapi_document() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/users"));
        assert!(doc.paths.paths.contains_key("/users/{id}"));
        assert!(doc.paths.paths.contains_key("/users/managed/{id}"));

        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("actor_id"));
    }
}
