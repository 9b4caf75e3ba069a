//! Delivery robot polling endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::domain::ReadyOrder;

/// `GET /robot/ready` — Orders waiting for pickup.
#[utoipa::path(
    get,
    path = "/api/qr-menu/robot/ready",
    tag = "Robot",
    summary = "List ready orders",
    description = "Returns every `ready` order as a `{table_number: \"Table_<n>\", order_id}` pair. Empty when nothing is waiting.",
    responses(
        (status = 200, description = "Ready orders", body = Vec<ReadyOrder>),
    )
)]
pub async fn ready_orders(State(state): State<AppState>) -> Json<Vec<ReadyOrder>> {
    Json(state.orders.ready().await)
}

/// Robot routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/robot/ready", get(ready_orders))
}
