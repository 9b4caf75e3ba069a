//! Order DTOs for create, list, and status update.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{NewOrder, OrderFilter, OrderId, OrderItem, OrderStatus};
use crate::error::MenuError;

/// Request body for `POST /orders`.
///
/// New orders always start `pending`; a `status` field in the body is
/// ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Table the order belongs to.
    pub table_number: u32,
    /// Ordered line items.
    pub items: Vec<OrderItem>,
    /// Client-computed total in minor currency units.
    pub total: i64,
    /// Client-supplied creation time.
    pub timestamp: String,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(req: CreateOrderRequest) -> Self {
        Self {
            table_number: req.table_number,
            items: req.items,
            total: req.total,
            timestamp: req.timestamp,
        }
    }
}

/// Response body for `POST /orders` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    /// Identifier of the stored order.
    pub order_id: OrderId,
    /// Human-readable outcome.
    pub message: String,
}

/// Query parameters for `GET /orders`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    /// Only orders for this table.
    #[serde(default)]
    pub table: Option<u32>,
    /// Only orders in this status (`pending`, `ready`, `delivered`, `failed`).
    #[serde(default)]
    pub status: Option<String>,
}

impl TryFrom<OrderListQuery> for OrderFilter {
    type Error = MenuError;

    fn try_from(query: OrderListQuery) -> Result<Self, Self::Error> {
        let status = query
            .status
            .as_deref()
            .map(str::parse::<OrderStatus>)
            .transpose()?;
        Ok(Self {
            table_number: query.table,
            status,
        })
    }
}

/// Request body for `PATCH /orders/{order_id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// New status (`pending`, `ready`, `delivered`, `failed`).
    pub status: String,
}
