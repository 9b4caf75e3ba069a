//! REST endpoint handlers organized by resource.

pub mod admin;
pub mod dashboard;
pub mod identity;
pub mod orders;
pub mod robot;
pub mod system;

use axum::Router;
use axum::routing::get;

use crate::app_state::AppState;

/// Composes the menu, ordering, robot, and admin routes mounted under
/// `/api/qr-menu`.
pub fn qr_menu_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(system::health_handler))
        .merge(identity::routes())
        .merge(orders::routes())
        .merge(robot::routes())
        .merge(admin::routes())
}
