//! # qr-menu-gateway
//!
//! Backend for a restaurant table-ordering system. Guests scan a per-table
//! QR code (or type a 4-digit PIN) to open the menu, place orders, and the
//! kitchen marks them ready for a delivery robot that polls for work. A
//! read-only dashboard summarizes the robot's mission log.
//!
//! ## Architecture
//!
//! ```text
//! Clients (menu frontend, kitchen, robot, admin)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── IdentityService / OrderService / AnalyticsService (service/)
//!     │
//!     ├── IdentityRegistry / OrderBook / FrontendUrlResolver (domain/)
//!     ├── Mission analytics engine (analytics/)
//!     │
//!     └── JSON file persistence (persistence/)
//! ```

pub mod analytics;
pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
