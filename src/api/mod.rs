//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Menu, ordering, robot, and admin endpoints are mounted under
//! `/api/qr-menu`; dashboard endpoints under `/api/dashboard`.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::routing::get;

use crate::app_state::AppState;

pub use openapi::ApiDoc;

/// Builds the complete API router with all REST endpoints.
///
/// With the `swagger-ui` feature, Swagger UI is served at `/swagger-ui`
/// and the document at `/api-docs/openapi.json`.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .route("/", get(handlers::system::root_handler))
        .nest("/api/qr-menu", handlers::qr_menu_routes())
        .nest("/api/dashboard", handlers::dashboard::routes());

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
    };

    router
}
