//! Liveness and readiness endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: String,
}

#[derive(Debug, Serialize)]
pub struct ReadyStatus {
    pub status: &'static str,
}

/// `GET /health`: the process is up and answering.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    tracing::info!("Health check called");
    Json(HealthStatus {
        status: "healthy",
        service: state.service_name.to_string(),
    })
}

/// `GET /ready`: 200 while serving, 503 once draining.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyStatus>) {
    if state.readiness.is_ready() {
        (StatusCode::OK, Json(ReadyStatus { status: "ready" }))
    } else {
        tracing::debug!("Readiness probe while draining");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyStatus { status: "draining" }),
        )
    }
}
