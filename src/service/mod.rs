//! Service layer: single-writer guards around each collection.
//!
//! [`IdentityService`] and [`OrderService`] serialize every
//! read-modify-write cycle of their collection behind one lock.
//! [`AnalyticsService`] is read-only and needs no coordination.

pub mod analytics_service;
pub mod identity_service;
pub mod order_service;

pub use analytics_service::AnalyticsService;
pub use identity_service::IdentityService;
pub use order_service::OrderService;
