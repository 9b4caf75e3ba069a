//! Robot dashboard endpoints backed by the mission log.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::analytics::{DailyBucket, Dashboard, DashboardMetrics, ErrorAlert, HourlyBucket};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, MenuError};

/// `GET /api/dashboard` — Everything in one payload.
///
/// # Errors
///
/// Returns [`MenuError::MissionLogUnavailable`] if the log cannot be read.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    summary = "Combined dashboard",
    description = "Metrics, both histograms, and the error digest computed from one read of the mission log.",
    responses(
        (status = 200, description = "Dashboard", body = Dashboard),
        (status = 503, description = "Mission log unavailable", body = ErrorResponse),
    )
)]
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, MenuError> {
    Ok(Json(state.analytics.dashboard().await?))
}

/// `GET /api/dashboard/metrics` — Headline metrics.
///
/// # Errors
///
/// Returns [`MenuError::MissionLogUnavailable`] if the log cannot be read.
#[utoipa::path(
    get,
    path = "/api/dashboard/metrics",
    tag = "Dashboard",
    summary = "Dashboard metrics",
    responses(
        (status = 200, description = "Metrics", body = DashboardMetrics),
        (status = 503, description = "Mission log unavailable", body = ErrorResponse),
    )
)]
pub async fn metrics(State(state): State<AppState>) -> Result<Json<DashboardMetrics>, MenuError> {
    Ok(Json(state.analytics.dashboard().await?.metrics))
}

/// `GET /api/dashboard/hourly` — Missions per hour over the last day.
///
/// # Errors
///
/// Returns [`MenuError::MissionLogUnavailable`] if the log cannot be read.
#[utoipa::path(
    get,
    path = "/api/dashboard/hourly",
    tag = "Dashboard",
    summary = "Hourly histogram",
    responses(
        (status = 200, description = "24 hourly buckets", body = Vec<HourlyBucket>),
        (status = 503, description = "Mission log unavailable", body = ErrorResponse),
    )
)]
pub async fn hourly(State(state): State<AppState>) -> Result<Json<Vec<HourlyBucket>>, MenuError> {
    Ok(Json(state.analytics.dashboard().await?.hourly))
}

/// `GET /api/dashboard/daily` — Missions per day over the last week.
///
/// # Errors
///
/// Returns [`MenuError::MissionLogUnavailable`] if the log cannot be read.
#[utoipa::path(
    get,
    path = "/api/dashboard/daily",
    tag = "Dashboard",
    summary = "Daily histogram",
    responses(
        (status = 200, description = "7 daily buckets, oldest first", body = Vec<DailyBucket>),
        (status = 503, description = "Mission log unavailable", body = ErrorResponse),
    )
)]
pub async fn daily(State(state): State<AppState>) -> Result<Json<Vec<DailyBucket>>, MenuError> {
    Ok(Json(state.analytics.dashboard().await?.daily))
}

/// `GET /api/dashboard/errors` — Error digest.
///
/// # Errors
///
/// Returns [`MenuError::MissionLogUnavailable`] if the log cannot be read.
#[utoipa::path(
    get,
    path = "/api/dashboard/errors",
    tag = "Dashboard",
    summary = "Error digest",
    responses(
        (status = 200, description = "Alerts with a non-zero count", body = Vec<ErrorAlert>),
        (status = 503, description = "Mission log unavailable", body = ErrorResponse),
    )
)]
pub async fn errors(State(state): State<AppState>) -> Result<Json<Vec<ErrorAlert>>, MenuError> {
    Ok(Json(state.analytics.dashboard().await?.errors))
}

/// Dashboard routes, mounted under `/api/dashboard`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/metrics", get(metrics))
        .route("/hourly", get(hourly))
        .route("/daily", get(daily))
        .route("/errors", get(errors))
}
