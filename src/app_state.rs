//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::FrontendUrlResolver;
use crate::service::{AnalyticsService, IdentityService, OrderService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Token and PIN maps.
    pub identity: Arc<IdentityService>,
    /// Order store and lifecycle.
    pub orders: Arc<OrderService>,
    /// Mission log analytics.
    pub analytics: Arc<AnalyticsService>,
    /// Cached frontend base URL for QR links.
    pub frontend: Arc<FrontendUrlResolver>,
}
