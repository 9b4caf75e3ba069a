//! Table identity DTOs: resolution, admin table management, QR info.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::TableIdentity;

/// Response body for token and PIN resolution.
#[derive(Debug, Serialize, ToSchema)]
pub struct TableResolution {
    /// Table the credential belongs to.
    pub table_number: u32,
}

/// Response body for `GET /admin/tables`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TableListResponse {
    /// Every table, ordered by table number.
    pub tables: Vec<TableIdentity>,
    /// Number of tables.
    pub total: usize,
}

/// Request body for `POST /admin/tables/configure`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfigureTablesRequest {
    /// Desired table count (1–100).
    pub total_tables: u32,
}

/// Response body for `POST /admin/tables/configure`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigureTablesResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Table count now configured.
    pub total_tables: u32,
    /// Freshly issued credentials, ordered by table number.
    pub tables: Vec<TableIdentity>,
}

/// Request body for `POST /admin/tables`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTableRequest {
    /// Token to register.
    pub token: String,
    /// Table the token opens.
    pub table_number: u32,
}

/// Response body for `POST /admin/tables`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateTableResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Registered token.
    pub token: String,
    /// PIN issued for the table.
    pub pin: String,
    /// Table number.
    pub table_number: u32,
}

/// Request body for `PUT /admin/tables/{token}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTableRequest {
    /// New table number for the token.
    pub table_number: u32,
}

/// Response body for `PUT /admin/tables/{token}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateTableResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Token that moved.
    pub token: String,
    /// Table number before the move.
    pub old_table_number: u32,
    /// Table number after the move.
    pub new_table_number: u32,
}

/// Response body for `DELETE /admin/tables/{token}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteTableResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Token that was removed.
    pub token: String,
    /// Table it was mapped to.
    pub table_number: u32,
}

/// Request body for `POST /admin/tables/bulk`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkReplaceRequest {
    /// Complete `{token: table_number}` mapping replacing the current one.
    pub mappings: BTreeMap<String, u32>,
}

/// Response body for `POST /admin/tables/bulk`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkReplaceResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Number of tables now mapped.
    pub total_tables: usize,
    /// Resulting credentials, ordered by table number.
    pub tables: Vec<TableIdentity>,
}

/// One table's entry in the QR info listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct QrCodeEntry {
    /// Table number.
    pub table_number: u32,
    /// Token encoded in the QR link.
    pub token: String,
    /// PIN printed next to the QR code.
    pub pin: String,
    /// Full link encoded in the QR code.
    pub qr_url: String,
}

/// Response body for `GET /admin/qr-codes/info`.
#[derive(Debug, Serialize, ToSchema)]
pub struct QrCodesInfoResponse {
    /// Frontend base URL the links point at.
    pub frontend_url: String,
    /// Per-table links, ordered by table number.
    pub tables: Vec<QrCodeEntry>,
    /// Number of tables.
    pub total: usize,
}
