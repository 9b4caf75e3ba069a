//! In-memory order collection.
//!
//! [`OrderBook`] is a plain value: it performs validation and mutation
//! only. Locking and persistence belong to
//! [`crate::service::OrderService`], which clones the book, applies the
//! change, persists the clone, then swaps it in.

use serde::{Deserialize, Serialize};

use super::order::{NewOrder, Order, OrderFilter, OrderStatus, ReadyOrder};
use super::OrderId;
use crate::error::MenuError;

/// Append-only collection of orders in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Returns `true` if no order has ever been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Returns `true` if `order_id` was ever assigned in this book.
    #[must_use]
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.orders.iter().any(|o| o.order_id == order_id)
    }

    /// Appends a new `pending` order under a fresh identifier.
    ///
    /// Identifiers are regenerated until they do not collide with any
    /// identifier in the book's history.
    pub fn create(&mut self, new_order: NewOrder) -> Order {
        let mut order_id = OrderId::new();
        while self.contains(order_id) {
            order_id = OrderId::new();
        }
        let order = Order::new(order_id, new_order);
        self.orders.push(order.clone());
        order
    }

    /// Returns the orders passing `filter`, newest first.
    ///
    /// Ordering is a lexicographic comparison of the timestamp strings, so
    /// callers must supply sortable timestamps (ISO-8601). Orders with equal
    /// timestamps keep their creation order.
    #[must_use]
    pub fn list(&self, filter: &OrderFilter) -> Vec<Order> {
        let mut matched: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matched
    }

    /// Returns the robot projection of every `ready` order, in creation order.
    #[must_use]
    pub fn ready(&self) -> Vec<ReadyOrder> {
        self.orders
            .iter()
            .filter(|o| o.status == OrderStatus::Ready)
            .map(ReadyOrder::from)
            .collect()
    }

    /// Overwrites the status of an order and returns the previous status
    /// along with the updated order.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::OrderNotFound`] if `order_id` is not in the book.
    pub fn set_status(
        &mut self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(OrderStatus, Order), MenuError> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| MenuError::OrderNotFound(order_id.to_string()))?;
        let previous = order.status;
        order.status = status;
        Ok((previous, order.clone()))
    }
}
