//! System endpoints: health check and form vocabularies.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::FUEL_TYPES;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /config/fuel-types`: Fuel vocabulary for the admin form.
#[utoipa::path(
    get,
    path = "/config/fuel-types",
    tag = "System",
    summary = "List fuel types",
    description = "Returns the fuel options offered by the admin form. The stored field is free text.",
    responses(
        (status = 200, description = "Fuel vocabulary", body = Vec<String>),
    )
)]
pub async fn fuel_types_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(FUEL_TYPES))
}

/// System routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/fuel-types", get(fuel_types_handler))
}
