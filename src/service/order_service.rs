//! Order service: the order store and lifecycle controller.

use std::path::PathBuf;

use tokio::sync::Mutex;

use crate::domain::{NewOrder, Order, OrderBook, OrderFilter, OrderId, OrderStatus, ReadyOrder};
use crate::error::MenuError;
use crate::persistence::JsonFileStore;

/// Single writer for the order collection.
///
/// Mutations follow the pattern: lock → clone book → apply → persist →
/// publish. Reads take the same lock, so a reader never observes a change
/// that has not reached disk.
#[derive(Debug)]
pub struct OrderService {
    book: Mutex<OrderBook>,
    store: JsonFileStore<OrderBook>,
}

impl OrderService {
    /// Loads (or initializes) the order collection at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::PersistenceError`] if the file cannot be read,
    /// parsed, or created.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, MenuError> {
        let store = JsonFileStore::new(path);
        let book: OrderBook = store.load_or_init().await?;
        tracing::info!(orders = book.len(), path = %store.path().display(), "order store loaded");
        Ok(Self {
            book: Mutex::new(book),
            store,
        })
    }

    /// Stores a new `pending` order and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::PersistenceError`] on write failure.
    pub async fn create(&self, new_order: NewOrder) -> Result<Order, MenuError> {
        let mut current = self.book.lock().await;
        let mut next = current.clone();
        let order = next.create(new_order);
        self.store.save(&next).await?;
        *current = next;
        tracing::info!(
            order_id = %order.order_id,
            table_number = order.table_number,
            items = order.items.len(),
            total = order.total,
            "order created"
        );
        Ok(order)
    }

    /// Lists orders matching `filter`, newest first.
    pub async fn list(&self, filter: OrderFilter) -> Vec<Order> {
        self.book.lock().await.list(&filter)
    }

    /// Returns the `ready` orders in the robot's projection.
    pub async fn ready(&self) -> Vec<ReadyOrder> {
        self.book.lock().await.ready()
    }

    /// Sets the status of `order_id` and returns the updated order.
    ///
    /// Any of the four statuses is accepted. Moves that are not forward
    /// edges of the lifecycle are logged at `warn`.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::OrderNotFound`] if the order does not exist, or
    /// [`MenuError::PersistenceError`] on write failure.
    pub async fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, MenuError> {
        let mut current = self.book.lock().await;
        let mut next = current.clone();
        let (previous, order) = next.set_status(order_id, status)?;
        self.store.save(&next).await?;
        *current = next;

        if previous != status && !previous.can_transition_to(status) {
            tracing::warn!(%order_id, from = %previous, to = %status, "non-forward status transition");
        }
        tracing::info!(%order_id, from = %previous, to = %status, "order status updated");
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tempdir() -> TempDir {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        dir
    }

    async fn open_in(dir: &TempDir) -> OrderService {
        let Ok(service) = OrderService::open(dir.path().join("orders.json")).await else {
            panic!("service should open");
        };
        service
    }

    fn new_order(table_number: u32, timestamp: &str) -> NewOrder {
        NewOrder {
            table_number,
            items: Vec::new(),
            total: 950,
            timestamp: timestamp.to_string(),
        }
    }

    #[tokio::test]
    async fn created_order_is_listed_pending() {
        let dir = tempdir();
        let service = open_in(&dir).await;
        let Ok(order) = service.create(new_order(2, "2024-05-01T12:00:00")).await else {
            panic!("create should succeed");
        };
        let listed = service.list(OrderFilter::default()).await;
        assert!(
            listed
                .iter()
                .any(|o| o.order_id == order.order_id && o.status == OrderStatus::Pending)
        );
    }

    #[tokio::test]
    async fn ready_then_delivered_is_accepted() {
        let dir = tempdir();
        let service = open_in(&dir).await;
        let Ok(order) = service.create(new_order(2, "t")).await else {
            panic!("create should succeed");
        };
        assert!(service.update_status(order.order_id, OrderStatus::Ready).await.is_ok());
        let Ok(done) = service
            .update_status(order.order_id, OrderStatus::Delivered)
            .await
        else {
            panic!("delivered should be accepted");
        };
        assert_eq!(done.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let dir = tempdir();
        let service = open_in(&dir).await;
        assert!(matches!(
            service.update_status(OrderId::new(), OrderStatus::Ready).await,
            Err(MenuError::OrderNotFound(_))
        ));
    }

    #[tokio::test]
    async fn ready_projection_for_robot() {
        let dir = tempdir();
        let service = open_in(&dir).await;
        assert!(service.ready().await.is_empty());

        let Ok(_a) = service.create(new_order(1, "t1")).await else {
            panic!("create should succeed");
        };
        let Ok(b) = service.create(new_order(6, "t2")).await else {
            panic!("create should succeed");
        };
        let _ = service.update_status(b.order_id, OrderStatus::Ready).await;

        let ready = service.ready().await;
        assert_eq!(
            ready,
            vec![ReadyOrder {
                table_number: "Table_6".to_string(),
                order_id: b.order_id,
            }]
        );
    }

    #[tokio::test]
    async fn orders_survive_restart() {
        let dir = tempdir();
        let service = open_in(&dir).await;
        let Ok(order) = service.create(new_order(3, "2024-05-01T12:00:00")).await else {
            panic!("create should succeed");
        };
        let _ = service.update_status(order.order_id, OrderStatus::Ready).await;
        drop(service);

        let reopened = open_in(&dir).await;
        let ready_only = reopened
            .list(OrderFilter {
                table_number: Some(3),
                status: Some(OrderStatus::Ready),
            })
            .await;
        assert_eq!(ready_only.len(), 1);
    }

    #[tokio::test]
    async fn legacy_records_load_instead_of_failing_startup() {
        let dir = tempdir();
        let path = dir.path().join("orders.json");
        let missing = OrderId::new();
        let cooking = OrderId::new();
        let legacy = format!(
            r#"[
                {{"order_id":"{missing}","table_number":2,"items":[],"total":0,"timestamp":"t1"}},
                {{"order_id":"{cooking}","table_number":3,"status":"cooking","timestamp":"t2"}}
            ]"#
        );
        assert!(std::fs::write(&path, legacy).is_ok());

        let Ok(service) = OrderService::open(&path).await else {
            panic!("legacy file should load");
        };
        let pending = service
            .list(OrderFilter {
                table_number: None,
                status: Some(OrderStatus::Pending),
            })
            .await;
        assert_eq!(pending.len(), 2);
        assert!(
            service
                .update_status(cooking, OrderStatus::Ready)
                .await
                .is_ok()
        );
    }
}
