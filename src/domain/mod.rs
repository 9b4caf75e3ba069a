//! Domain layer: typed records and in-memory collections.
//!
//! This module contains the order model and its status state machine, the
//! order book, table identity mappings with credential generation, and the
//! frontend URL resolver used to build QR links. Nothing here touches the
//! filesystem; the service layer owns locking and persistence.

pub mod credentials;
pub mod frontend_url;
pub mod identity_registry;
pub mod order;
pub mod order_book;
pub mod order_id;

pub use frontend_url::{CachedUrl, FrontendUrlResolver, HostProbe, RouteProbe};
pub use identity_registry::{IdentityRegistry, MAX_TABLES, TableIdentity};
pub use order::{NewOrder, Order, OrderFilter, OrderItem, OrderStatus, ReadyOrder};
pub use order_book::OrderBook;
pub use order_id::OrderId;
