//! qr-menu-gateway server entry point.
//!
//! Loads the table, PIN, and order files, then starts the Axum HTTP server.

use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use qr_menu_gateway::api;
use qr_menu_gateway::app_state::AppState;
use qr_menu_gateway::config::{GatewayConfig, LogFormat};
use qr_menu_gateway::domain::{FrontendUrlResolver, RouteProbe};
use qr_menu_gateway::service::{AnalyticsService, IdentityService, OrderService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting qr-menu-gateway");

    // Build service layer
    let identity = IdentityService::open(&config.table_mapping_file, &config.table_pin_file)
        .await
        .context("failed to load table identity files")?;
    let orders = OrderService::open(&config.orders_file)
        .await
        .with_context(|| format!("failed to load {}", config.orders_file.display()))?;
    let analytics = AnalyticsService::new(&config.mission_log_file);
    let frontend = FrontendUrlResolver::new(
        Arc::new(RouteProbe::default()),
        config.frontend_port,
        config.frontend_url.clone(),
        config.frontend_url_ttl,
    );

    // Build application state
    let app_state = AppState {
        identity: Arc::new(identity),
        orders: Arc::new(orders),
        analytics: Arc::new(analytics),
        frontend: Arc::new(frontend),
    };

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_allowed_origins)?)
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Any origin when `origins` is empty, otherwise exactly the listed ones.
fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }
    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin: {o}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}
