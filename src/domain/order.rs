//! Order records and the order status state machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::OrderId;
use crate::error::MenuError;

/// Lifecycle status of an order.
///
/// ```text
/// pending ──▶ ready ──▶ delivered
///    │          │
///    └──────────┴─────▶ failed
/// ```
///
/// `delivered` and `failed` are terminal. Transitions outside this graph
/// are accepted by the store but reported through
/// [`OrderStatus::can_transition_to`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed by the customer, not yet prepared.
    #[default]
    Pending,
    /// Prepared and waiting for robot pickup.
    Ready,
    /// Handed over at the table.
    Delivered,
    /// Delivery or preparation failed.
    Failed,
}

impl OrderStatus {
    /// Every valid status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Ready, Self::Delivered, Self::Failed];

    /// Returns the wire representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` for statuses with no outgoing transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Failed)
    }

    /// Returns `true` if `next` is a forward edge of the lifecycle graph.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Ready | Self::Failed) | (Self::Ready, Self::Delivered | Self::Failed)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| MenuError::InvalidStatus(s.to_string()))
    }
}

/// A single line item, copied verbatim from the menu at ordering time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    /// Menu catalog identifier.
    #[serde(rename = "id")]
    pub catalog_id: i64,
    /// Display name.
    pub name: String,
    /// Menu description.
    #[serde(default)]
    pub description: String,
    /// Unit price in minor currency units.
    #[serde(rename = "price")]
    pub unit_price: i64,
    /// Number of units ordered.
    pub quantity: u32,
    /// Menu category.
    #[serde(default)]
    pub category: String,
    /// Image reference shown by the menu frontend.
    #[serde(rename = "image", default)]
    pub image_ref: String,
}

/// Client-supplied fields of a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Table the order belongs to.
    pub table_number: u32,
    /// Ordered line items.
    pub items: Vec<OrderItem>,
    /// Client-computed total in minor currency units (trusted as-is).
    pub total: i64,
    /// Client-supplied creation time, used as the sort key.
    pub timestamp: String,
}

/// A persisted order. Only `status` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    /// Unique order identifier.
    pub order_id: OrderId,
    /// Table the order belongs to.
    #[serde(default)]
    pub table_number: u32,
    /// Ordered line items.
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Client-computed total in minor currency units.
    #[serde(default)]
    pub total: i64,
    /// Client-supplied creation time. Missing values sort lowest.
    #[serde(default)]
    pub timestamp: String,
    /// Current lifecycle status. Missing, `null`, or unrecognized stored
    /// values load as `pending`.
    #[serde(default, deserialize_with = "stored_status")]
    pub status: OrderStatus,
}

/// Reads a persisted status without rejecting the whole collection.
///
/// Older files may hold statuses outside the four-value set; those load as
/// [`OrderStatus::Pending`] and are logged.
fn stored_status<'de, D>(deserializer: D) -> Result<OrderStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(OrderStatus::default());
    };
    Ok(raw.parse().unwrap_or_else(|_| {
        tracing::warn!(status = %raw, "unrecognized stored order status, loading as pending");
        OrderStatus::default()
    }))
}

impl Order {
    /// Builds a `pending` order from client input.
    #[must_use]
    pub fn new(order_id: OrderId, new_order: NewOrder) -> Self {
        Self {
            order_id,
            table_number: new_order.table_number,
            items: new_order.items,
            total: new_order.total,
            timestamp: new_order.timestamp,
            status: OrderStatus::Pending,
        }
    }
}

/// Equality filters for order listing. Both are optional and AND-combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Only orders for this table.
    pub table_number: Option<u32>,
    /// Only orders in this status.
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    /// Returns `true` if `order` passes every configured filter.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        self.table_number.is_none_or(|table| order.table_number == table)
            && self.status.is_none_or(|status| order.status == status)
    }
}

/// Projection of a `ready` order consumed by the delivery robot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReadyOrder {
    /// Robot destination label, formatted as `Table_<n>`.
    pub table_number: String,
    /// Order to deliver.
    pub order_id: OrderId,
}

impl From<&Order> for ReadyOrder {
    fn from(order: &Order) -> Self {
        Self {
            table_number: format!("Table_{}", order.table_number),
            order_id: order.order_id,
        }
    }
}
