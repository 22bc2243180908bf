use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::info;
use userdir_core::{GroupId, RoleCode, UserId};
use validator::Validate;

use crate::{
    error::{ApiError, Result},
    models::*,
    state::AppState,
};

fn user_not_found(id: UserId) -> ApiError {
    ApiError::NotFound(format!("User with ID #{id} not found"))
}

fn path_id(path: std::result::Result<Path<UserId>, PathRejection>) -> Result<UserId> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Reject role codes without a definition and groups that are not configured
fn check_directory(state: &AppState, roles: &[RoleCode], groups: &[GroupId]) -> Result<()> {
    if let Some(code) = roles.iter().find(|code| !state.roles.contains(code)) {
        return Err(ApiError::ValidationError(format!("Unknown role code '{code}'")));
    }

    if let Some(group) = groups.iter().find(|group| !state.groups.contains(*group)) {
        return Err(ApiError::ValidationError(format!("Unknown group '{group}'")));
    }

    Ok(())
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Guard decision metrics (Prometheus format)
#[utoipa::path(
    get,
    path = "/metrics",
    responses(
        (status = 200, description = "Prometheus metrics", body = String)
    ),
    tag = "health"
)]
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = state
        .guard
        .metrics()
        .map(|metrics| metrics.export_prometheus())
        .unwrap_or_default();

    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Missing CREATE permission", body = ErrorResponse)
    ),
    security(("actor_id" = [])),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let req = json_body(payload)?;
    req.validate()?;
    check_directory(&state, &req.roles, &req.groups)?;

    let user = state
        .users
        .create(req.into())
        .map_err(|e| ApiError::InternalError(e.to_string()))?;
    info!(user_id = user.id, "Created user");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users, ordered by id", body = Vec<UserResponse>),
        (status = 403, description = "Missing VIEW permission", body = ErrorResponse)
    ),
    security(("actor_id" = [])),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserResponse>> {
    Json(state.users.list().into_iter().map(UserResponse::from).collect())
}

/// Users managed by the given user
#[utoipa::path(
    get,
    path = "/users/managed/{id}",
    params(
        ("id" = u64, Path, description = "Manager user ID")
    ),
    responses(
        (status = 200, description = "Managed users; empty unless the user is an admin", body = Vec<UserResponse>),
        (status = 400, description = "Invalid user ID", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn managed_users(
    State(state): State<AppState>,
    path: std::result::Result<Path<UserId>, PathRejection>,
) -> Result<Json<Vec<UserResponse>>> {
    let manager_id = path_id(path)?;
    let managed = state.scope.find_managed_users(manager_id);

    Ok(Json(managed.into_iter().map(UserResponse::from).collect()))
}

/// Update a user
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Missing EDIT permission", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("actor_id" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    path: std::result::Result<Path<UserId>, PathRejection>,
    payload: std::result::Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>> {
    let id = path_id(path)?;
    let req = json_body(payload)?;
    req.validate()?;
    check_directory(
        &state,
        req.roles.as_deref().unwrap_or_default(),
        req.groups.as_deref().unwrap_or_default(),
    )?;

    let user = state
        .users
        .update(id, req.into())
        .ok_or_else(|| user_not_found(id))?;
    info!(user_id = id, "Updated user");

    Ok(Json(user.into()))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Missing DELETE permission", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("actor_id" = [])),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    path: std::result::Result<Path<UserId>, PathRejection>,
) -> Result<StatusCode> {
    let id = path_id(path)?;

    if !state.users.delete(id) {
        return Err(user_not_found(id));
    }
    info!(user_id = id, "Deleted user");

    Ok(StatusCode::NO_CONTENT)
}
