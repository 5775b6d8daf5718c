//! User resource handlers plus the service index and metrics endpoints.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::http::extract::JsonPayload;
use crate::http::request::parse_id;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::store::{CreateUser, UpdateUser, User};

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<User>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub users: &'static str,
    pub metrics: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

/// `GET /`
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: state.service_name.to_string(),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            health: "/health",
            users: "/users",
            metrics: "/metrics",
        },
    })
}

/// `GET /users`
pub async fn list_users(State(state): State<AppState>) -> Json<UserList> {
    let users = state.store.list();
    tracing::info!(total = users.len(), "Fetching all users");
    Json(UserList {
        count: users.len(),
        users,
    })
}

/// `GET /users/{id}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    match parse_id(&raw_id).and_then(|id| state.store.get(id)) {
        Some(user) => {
            tracing::info!(id = user.id, "User found");
            Ok(Json(user))
        }
        None => {
            tracing::warn!(id = %raw_id, "User not found");
            Err(ApiError::UserNotFound)
        }
    }
}

/// `POST /users`
pub async fn create_user(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload<CreateUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let (user, total) = state.store.create(payload)?;
    metrics::record_user_count(total);
    tracing::info!(id = user.id, name = %user.name, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /users/{id}`
///
/// Existence is checked before the body so an unknown id is a 404 even
/// when the body is malformed.
pub async fn update_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<JsonPayload<UpdateUser>, ApiError>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&raw_id)
        .filter(|id| state.store.get(*id).is_some())
        .ok_or(ApiError::UserNotFound)?;
    let JsonPayload(payload) = body?;

    let user = state.store.update(id, payload)?;
    tracing::info!(id, "User updated");
    Ok(Json(user))
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let id = parse_id(&raw_id).ok_or(ApiError::UserNotFound)?;
    let (_, total) = state.store.delete(id)?;
    metrics::record_user_count(total);
    tracing::info!(id, "User deleted");
    Ok(Json(Message {
        message: "User deleted",
    }))
}

/// `GET /metrics`
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(metrics::render)
        .unwrap_or_default();
    ([(header::CONTENT_TYPE, metrics::CONTENT_TYPE)], body)
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Fallback for known routes hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
