//! Table identity resolution: QR token and PIN lookups.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::TableResolution;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, MenuError};

/// `GET /table/{token}` — Resolve a scanned QR token.
///
/// # Errors
///
/// Returns [`MenuError::TokenNotFound`] if the token is unknown.
#[utoipa::path(
    get,
    path = "/api/qr-menu/table/{token}",
    tag = "Tables",
    summary = "Resolve a QR token",
    description = "Returns the table number encoded by a scanned QR token.",
    params(
        ("token" = String, Path, description = "Table token from the QR link"),
    ),
    responses(
        (status = 200, description = "Table resolved", body = TableResolution),
        (status = 404, description = "Unknown token", body = ErrorResponse),
    )
)]
pub async fn resolve_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<TableResolution>, MenuError> {
    let table_number = state.identity.resolve_token(&token).await?;
    Ok(Json(TableResolution { table_number }))
}

/// `GET /pin/{pin}` — Resolve a typed PIN.
///
/// # Errors
///
/// Returns [`MenuError::PinNotFound`] if the PIN is unknown.
#[utoipa::path(
    get,
    path = "/api/qr-menu/pin/{pin}",
    tag = "Tables",
    summary = "Resolve a table PIN",
    description = "Returns the table number for a 4-digit PIN entered by hand.",
    params(
        ("pin" = String, Path, description = "Table PIN"),
    ),
    responses(
        (status = 200, description = "Table resolved", body = TableResolution),
        (status = 404, description = "Unknown PIN", body = ErrorResponse),
    )
)]
pub async fn resolve_pin(
    State(state): State<AppState>,
    Path(pin): Path<String>,
) -> Result<Json<TableResolution>, MenuError> {
    let table_number = state.identity.resolve_pin(pin.trim()).await?;
    Ok(Json(TableResolution { table_number }))
}

/// Identity resolution routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/table/{token}", get(resolve_token))
        .route("/pin/{pin}", get(resolve_pin))
}
