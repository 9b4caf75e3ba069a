//! OpenAPI document for the REST API.

use utoipa::OpenApi;

use crate::analytics::{
    DailyBucket, Dashboard, DashboardMetrics, ErrorAlert, HourlyBucket, Severity,
};
use crate::api::dto::{
    BulkReplaceRequest, BulkReplaceResponse, ConfigureTablesRequest, ConfigureTablesResponse,
    CreateOrderRequest, CreateOrderResponse, CreateTableRequest, CreateTableResponse,
    DeleteTableResponse, QrCodeEntry, QrCodesInfoResponse, TableListResponse, TableResolution,
    UpdateStatusRequest, UpdateTableRequest, UpdateTableResponse,
};
use crate::api::handlers::system::{HealthResponse, RootResponse};
use crate::domain::{Order, OrderId, OrderItem, OrderStatus, ReadyOrder, TableIdentity};
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "QR Menu Gateway API",
        description = "Table identity, order lifecycle, robot polling, and mission dashboards."
    ),
    paths(
        crate::api::handlers::system::root_handler,
        crate::api::handlers::system::health_handler,
        crate::api::handlers::identity::resolve_token,
        crate::api::handlers::identity::resolve_pin,
        crate::api::handlers::orders::create_order,
        crate::api::handlers::orders::list_orders,
        crate::api::handlers::orders::update_order_status,
        crate::api::handlers::robot::ready_orders,
        crate::api::handlers::admin::list_tables,
        crate::api::handlers::admin::create_table,
        crate::api::handlers::admin::configure_tables,
        crate::api::handlers::admin::bulk_replace_tables,
        crate::api::handlers::admin::update_table,
        crate::api::handlers::admin::delete_table,
        crate::api::handlers::admin::qr_codes_info,
        crate::api::handlers::dashboard::dashboard,
        crate::api::handlers::dashboard::metrics,
        crate::api::handlers::dashboard::hourly,
        crate::api::handlers::dashboard::daily,
        crate::api::handlers::dashboard::errors,
    ),
    components(schemas(
        ErrorResponse,
        ErrorBody,
        RootResponse,
        HealthResponse,
        TableResolution,
        TableIdentity,
        TableListResponse,
        CreateTableRequest,
        CreateTableResponse,
        ConfigureTablesRequest,
        ConfigureTablesResponse,
        UpdateTableRequest,
        UpdateTableResponse,
        DeleteTableResponse,
        BulkReplaceRequest,
        BulkReplaceResponse,
        QrCodeEntry,
        QrCodesInfoResponse,
        OrderId,
        OrderItem,
        OrderStatus,
        Order,
        ReadyOrder,
        CreateOrderRequest,
        CreateOrderResponse,
        UpdateStatusRequest,
        Dashboard,
        DashboardMetrics,
        HourlyBucket,
        DailyBucket,
        ErrorAlert,
        Severity,
    )),
    tags(
        (name = "System", description = "Service banner and health"),
        (name = "Tables", description = "QR token and PIN resolution"),
        (name = "Orders", description = "Order placement and lifecycle"),
        (name = "Robot", description = "Delivery robot polling"),
        (name = "Admin", description = "Table provisioning and QR links"),
        (name = "Dashboard", description = "Mission log analytics"),
    )
)]
pub struct ApiDoc;
