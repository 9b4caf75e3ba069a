//! Persistence layer: whole-collection JSON documents on local disk.
//!
//! The service runs as the single writer of each file. The on-disk shapes
//! are plain JSON: `{token: table}` and `{pin: table}` objects for the two
//! identity maps and an array of order records.

pub mod json_file;

pub use json_file::{JsonFileStore, StagedWrite};
