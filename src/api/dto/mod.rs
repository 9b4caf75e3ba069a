//! Data Transfer Objects for REST request/response serialization.
//!
//! Domain records that already have a stable wire shape (`Order`,
//! `ReadyOrder`, `TableIdentity`, the dashboard types) are returned
//! directly; the types here cover request bodies and envelopes.

pub mod identity_dto;
pub mod order_dto;

pub use identity_dto::*;
pub use order_dto::*;
