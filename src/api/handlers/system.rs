//! System endpoints: service banner and health check.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

/// Service banner returned by `GET /`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    /// Service name.
    pub message: String,
    /// Crate version.
    pub version: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests.
    pub status: String,
    /// Current server time (RFC 3339).
    pub timestamp: String,
    /// Crate version.
    pub version: String,
}

/// `GET /` — Service banner.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    summary = "Service banner",
    responses(
        (status = 200, description = "Service name and version", body = RootResponse),
    )
)]
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "QR Menu API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/qr-menu/health` — Service health status.
#[utoipa::path(
    get,
    path = "/api/qr-menu/health",
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
