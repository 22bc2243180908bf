//! Middleware layer for the API server
//!
//! This module provides middleware components for:
//! - Permission checks on the user routes
//! - Request logging and tracing
//! - CORS configuration
//! - Request ID tracking
//! - Server error logging

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info, warn};
use userdir_authz::{AccessGuard, Decision};
use userdir_core::Permission;
use uuid::Uuid;

use crate::error::ApiError;

/// Request ID header name
pub const X_REQUEST_ID: &str = "x-request-id";

/// Configure CORS middleware
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::HeaderName::from_static(X_REQUEST_ID),
        ])
        .expose_headers([header::HeaderName::from_static(X_REQUEST_ID)])
        .max_age(std::time::Duration::from_secs(3600))
}

fn request_id(request: &Request) -> Uuid {
    request
        .extensions()
        .get::<Uuid>()
        .copied()
        .unwrap_or_else(Uuid::new_v4)
}

/// Request ID middleware
///
/// Generates or extracts a unique request ID for tracking requests through
/// the system. The request ID is returned in the response headers.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }

    response
}

/// Request logging middleware
///
/// Logs every request with method, URI and response status; the level
/// follows the status class.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request_id(&request);

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Incoming request"
    );

    let start = std::time::Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    let status = response.status();

    // `event!` needs a constant level
    macro_rules! completed {
        ($lvl:expr) => {
            tracing::event!(
                $lvl,
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = status.as_u16(),
                duration_ms = elapsed.as_millis() as u64,
                "Request completed"
            )
        };
    }

    match status.as_u16() {
        500..=599 => completed!(tracing::Level::ERROR),
        400..=499 => completed!(tracing::Level::WARN),
        _ => completed!(tracing::Level::INFO),
    }

    response
}

/// Server error logging middleware
pub async fn error_handling_middleware(request: Request, next: Next) -> Response {
    let request_id = request_id(&request);

    let response = next.run(request).await;

    if response.status().is_server_error() {
        error!(
            request_id = %request_id,
            status = %response.status().as_u16(),
            "Server error occurred"
        );
    }

    response
}

/// Required permission for one route, paired with the guard that checks it
#[derive(Clone)]
pub struct PermissionGate {
    guard: Arc<AccessGuard>,
    required: Option<Permission>,
}

impl PermissionGate {
    pub fn new(guard: Arc<AccessGuard>, required: Option<Permission>) -> Self {
        Self { guard, required }
    }

    pub fn required(&self) -> Option<&Permission> {
        self.required.as_ref()
    }
}

/// Permission guard middleware
///
/// The actor is the raw user id carried in the `Authorization` header.
/// Any denial becomes a 403 with the deny reason as the message.
pub async fn permission_guard(
    State(gate): State<PermissionGate>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let request_id = request_id(&request);

    let actor = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    match gate.guard.authorize(actor.as_deref(), gate.required()) {
        Decision::Allow => {
            debug!(
                request_id = %request_id,
                actor = ?actor,
                "Permission check passed"
            );
            Ok(next.run(request).await)
        }
        Decision::Deny(reason) => {
            warn!(
                request_id = %request_id,
                actor = ?actor,
                path = %request.uri().path(),
                required = ?gate.required().map(Permission::as_str),
                reason = reason.label(),
                "Permission denied"
            );
            Err(ApiError::Forbidden(reason.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;
    use userdir_authz::{
        EngineConfig, InMemoryUserStore, PermissionResolver, SeedData, StaticRoleDirectory,
    };

    async fn test_handler() -> &'static str {
        "OK"
    }

    fn guard() -> Arc<AccessGuard> {
        let seed = SeedData::builtin();
        let roles = Arc::new(StaticRoleDirectory::new(seed.roles).unwrap());
        let users = Arc::new(InMemoryUserStore::with_users(seed.users).unwrap());
        Arc::new(AccessGuard::new(
            EngineConfig::default(),
            users,
            PermissionResolver::new(roles),
        ))
    }

    fn guarded(required: Option<Permission>) -> Router {
        let gate = PermissionGate::new(guard(), required);
        Router::new()
            .route("/", get(test_handler))
            .route_layer(middleware::from_fn_with_state(gate, permission_guard))
    }

    fn get_as(actor: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        if let Some(actor) = actor {
            builder = builder.header(header::AUTHORIZATION, actor);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_request_id_middleware() {
        let app = Router::new()
            .route("/", get(test_handler))
            .layer(middleware::from_fn(request_id_middleware));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let app = Router::new()
            .route("/", get(test_handler))
            .layer(middleware::from_fn(request_id_middleware));

        let id = Uuid::new_v4().to_string();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(X_REQUEST_ID, &id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[X_REQUEST_ID], id.as_str());
    }

    #[tokio::test]
    async fn test_cors_layer() {
        let app = Router::new()
            .route("/", get(test_handler))
            .layer(cors_layer());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/")
                    .header(header::ORIGIN, "http://example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_guard_allows_permitted_actor() {
        let response = guarded(Some(Permission::VIEW))
            .oneshot(get_as(Some("6")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_guard_forbids() {
        for actor in [None, Some(""), Some("abc"), Some("99"), Some("2")] {
            let response = guarded(Some(Permission::VIEW))
                .oneshot(get_as(actor))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "actor {actor:?}");
        }
    }

    #[tokio::test]
    async fn test_guard_without_requirement() {
        let response = guarded(None).oneshot(get_as(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_guard_reads_non_utf8_header() {
        let request = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, HeaderValue::from_bytes(b"\xff1").unwrap())
            .body(Body::empty())
            .unwrap();

        let response = guarded(Some(Permission::VIEW)).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
