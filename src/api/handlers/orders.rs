//! Order handlers: create, list, status update.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{patch, post};
use axum::{Json, Router};

use crate::api::dto::{CreateOrderRequest, CreateOrderResponse, OrderListQuery, UpdateStatusRequest};
use crate::app_state::AppState;
use crate::domain::{Order, OrderFilter, OrderId, OrderStatus};
use crate::error::{ErrorResponse, MenuError};

/// `POST /orders` — Place an order.
///
/// # Errors
///
/// Returns [`MenuError::PersistenceError`] if the order cannot be stored.
#[utoipa::path(
    post,
    path = "/api/qr-menu/orders",
    tag = "Orders",
    summary = "Create an order",
    description = "Stores a new order in `pending` status and returns its identifier.",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order stored", body = CreateOrderResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, MenuError> {
    let Json(req) = payload?;
    let order = state.orders.create(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order_id: order.order_id,
            message: "Order saved successfully".to_string(),
        }),
    ))
}

/// `GET /orders` — List orders, newest first.
///
/// # Errors
///
/// Returns [`MenuError::InvalidStatus`] for an unknown status filter.
#[utoipa::path(
    get,
    path = "/api/qr-menu/orders",
    tag = "Orders",
    summary = "List orders",
    description = "Returns orders sorted by timestamp, newest first, optionally filtered by table and status.",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Matching orders", body = Vec<Order>),
        (status = 400, description = "Invalid status filter", body = ErrorResponse),
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    query: Result<Query<OrderListQuery>, QueryRejection>,
) -> Result<Json<Vec<Order>>, MenuError> {
    let Query(query) = query?;
    let filter = OrderFilter::try_from(query)?;
    Ok(Json(state.orders.list(filter).await))
}

/// `PATCH /orders/{order_id}` — Change an order's status.
///
/// # Errors
///
/// Returns [`MenuError::InvalidStatus`] for an unknown status, or
/// [`MenuError::OrderNotFound`] if the order does not exist.
#[utoipa::path(
    patch,
    path = "/api/qr-menu/orders/{order_id}",
    tag = "Orders",
    summary = "Update order status",
    description = "Sets the order's status to one of `pending`, `ready`, `delivered`, `failed` and returns the updated order.",
    params(
        ("order_id" = String, Path, description = "Order UUID"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 400, description = "Invalid status", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    )
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Order>, MenuError> {
    let Json(req) = payload?;
    let status: OrderStatus = req.status.parse()?;
    let id: OrderId = order_id
        .parse()
        .map_err(|_| MenuError::OrderNotFound(order_id.clone()))?;
    let order = state.orders.update_status(id, status).await?;
    Ok(Json(order))
}

/// Order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/{order_id}", patch(update_order_status))
}
