//! Table administration: provisioning, manual mappings, QR link info.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::api::dto::{
    BulkReplaceRequest, BulkReplaceResponse, ConfigureTablesRequest, ConfigureTablesResponse,
    CreateTableRequest, CreateTableResponse, DeleteTableResponse, QrCodeEntry, QrCodesInfoResponse,
    TableListResponse, UpdateTableRequest, UpdateTableResponse,
};
use crate::app_state::AppState;
use crate::domain::FrontendUrlResolver;
use crate::error::{ErrorResponse, MenuError};

/// `GET /admin/tables` — List every table.
#[utoipa::path(
    get,
    path = "/api/qr-menu/admin/tables",
    tag = "Admin",
    summary = "List tables",
    description = "Returns every token/PIN/table triple ordered by table number.",
    responses(
        (status = 200, description = "All tables", body = TableListResponse),
    )
)]
pub async fn list_tables(State(state): State<AppState>) -> Json<TableListResponse> {
    let tables = state.identity.list().await;
    let total = tables.len();
    Json(TableListResponse { tables, total })
}

/// `POST /admin/tables` — Register a token for a table.
///
/// # Errors
///
/// Returns [`MenuError::Conflict`] if the token or table number is taken.
#[utoipa::path(
    post,
    path = "/api/qr-menu/admin/tables",
    tag = "Admin",
    summary = "Create a table mapping",
    description = "Maps a new token to a table number and issues the table's PIN.",
    request_body = CreateTableRequest,
    responses(
        (status = 201, description = "Mapping created", body = CreateTableResponse),
        (status = 400, description = "Invalid table number", body = ErrorResponse),
        (status = 409, description = "Token or table already mapped", body = ErrorResponse),
    )
)]
pub async fn create_table(
    State(state): State<AppState>,
    payload: Result<Json<CreateTableRequest>, JsonRejection>,
) -> Result<impl IntoResponse, MenuError> {
    let Json(req) = payload?;
    let identity = state.identity.insert(&req.token, req.table_number).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateTableResponse {
            message: "Table mapping created successfully".to_string(),
            token: identity.token,
            pin: identity.pin,
            table_number: identity.table_number,
        }),
    ))
}

/// `POST /admin/tables/configure` — Replace all tables with `1..=n`.
///
/// # Errors
///
/// Returns [`MenuError::InvalidArgument`] if `total_tables` is outside
/// `1..=100`.
#[utoipa::path(
    post,
    path = "/api/qr-menu/admin/tables/configure",
    tag = "Admin",
    summary = "Provision tables",
    description = "Discards every mapping and issues a fresh token and PIN for tables 1 through `total_tables`.",
    request_body = ConfigureTablesRequest,
    responses(
        (status = 200, description = "Tables provisioned", body = ConfigureTablesResponse),
        (status = 400, description = "Table count out of range", body = ErrorResponse),
    )
)]
pub async fn configure_tables(
    State(state): State<AppState>,
    payload: Result<Json<ConfigureTablesRequest>, JsonRejection>,
) -> Result<Json<ConfigureTablesResponse>, MenuError> {
    let Json(req) = payload?;
    let tables = state.identity.provision(req.total_tables).await?;
    Ok(Json(ConfigureTablesResponse {
        message: format!("Successfully configured {} table(s)", req.total_tables),
        total_tables: req.total_tables,
        tables,
    }))
}

/// `POST /admin/tables/bulk` — Replace all mappings at once.
///
/// # Errors
///
/// Returns [`MenuError::InvalidArgument`] if table numbers repeat.
#[utoipa::path(
    post,
    path = "/api/qr-menu/admin/tables/bulk",
    tag = "Admin",
    summary = "Bulk replace mappings",
    description = "Replaces every token mapping with the supplied `{token: table_number}` object and issues fresh PINs.",
    request_body = BulkReplaceRequest,
    responses(
        (status = 200, description = "Mappings replaced", body = BulkReplaceResponse),
        (status = 400, description = "Duplicate table numbers", body = ErrorResponse),
    )
)]
pub async fn bulk_replace_tables(
    State(state): State<AppState>,
    payload: Result<Json<BulkReplaceRequest>, JsonRejection>,
) -> Result<Json<BulkReplaceResponse>, MenuError> {
    let Json(req) = payload?;
    state.identity.bulk_replace(req.mappings).await?;
    let tables = state.identity.list().await;
    Ok(Json(BulkReplaceResponse {
        message: "Table mappings updated successfully".to_string(),
        total_tables: tables.len(),
        tables,
    }))
}

/// `PUT /admin/tables/{token}` — Move a token to another table.
///
/// # Errors
///
/// Returns [`MenuError::TokenNotFound`] or [`MenuError::Conflict`].
#[utoipa::path(
    put,
    path = "/api/qr-menu/admin/tables/{token}",
    tag = "Admin",
    summary = "Update a table mapping",
    description = "Changes the table number of an existing token. The table's PIN moves with it.",
    params(
        ("token" = String, Path, description = "Table token"),
    ),
    request_body = UpdateTableRequest,
    responses(
        (status = 200, description = "Mapping updated", body = UpdateTableResponse),
        (status = 404, description = "Unknown token", body = ErrorResponse),
        (status = 409, description = "Table number taken", body = ErrorResponse),
    )
)]
pub async fn update_table(
    State(state): State<AppState>,
    Path(token): Path<String>,
    payload: Result<Json<UpdateTableRequest>, JsonRejection>,
) -> Result<Json<UpdateTableResponse>, MenuError> {
    let Json(req) = payload?;
    let (old_table_number, identity) = state
        .identity
        .update_table_number(&token, req.table_number)
        .await?;
    Ok(Json(UpdateTableResponse {
        message: "Table mapping updated successfully".to_string(),
        token: identity.token,
        old_table_number,
        new_table_number: identity.table_number,
    }))
}

/// `DELETE /admin/tables/{token}` — Remove a token.
///
/// # Errors
///
/// Returns [`MenuError::TokenNotFound`] if the token is unknown.
#[utoipa::path(
    delete,
    path = "/api/qr-menu/admin/tables/{token}",
    tag = "Admin",
    summary = "Delete a table mapping",
    description = "Removes the token and its table's PIN.",
    params(
        ("token" = String, Path, description = "Table token"),
    ),
    responses(
        (status = 200, description = "Mapping deleted", body = DeleteTableResponse),
        (status = 404, description = "Unknown token", body = ErrorResponse),
    )
)]
pub async fn delete_table(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<DeleteTableResponse>, MenuError> {
    let table_number = state.identity.delete(&token).await?;
    Ok(Json(DeleteTableResponse {
        message: "Table mapping deleted successfully".to_string(),
        token,
        table_number,
    }))
}

/// `GET /admin/qr-codes/info` — QR links for every table.
#[utoipa::path(
    get,
    path = "/api/qr-menu/admin/qr-codes/info",
    tag = "Admin",
    summary = "QR link info",
    description = "Returns the frontend base URL and the link each table's QR code should encode.",
    responses(
        (status = 200, description = "QR links", body = QrCodesInfoResponse),
    )
)]
pub async fn qr_codes_info(State(state): State<AppState>) -> Json<QrCodesInfoResponse> {
    let frontend_url = state.frontend.resolve().await;
    let tables: Vec<QrCodeEntry> = state
        .identity
        .list()
        .await
        .into_iter()
        .map(|table| QrCodeEntry {
            qr_url: FrontendUrlResolver::qr_url(&frontend_url, &table.token),
            table_number: table.table_number,
            token: table.token,
            pin: table.pin,
        })
        .collect();
    let total = tables.len();
    Json(QrCodesInfoResponse {
        frontend_url,
        tables,
        total,
    })
}

/// Admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/tables", get(list_tables).post(create_table))
        .route("/admin/tables/configure", post(configure_tables))
        .route("/admin/tables/bulk", post(bulk_replace_tables))
        .route("/admin/tables/{token}", put(update_table).delete(delete_table))
        .route("/admin/qr-codes/info", get(qr_codes_info))
}
