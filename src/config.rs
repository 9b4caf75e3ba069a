//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). File locations default to names under
//! `DATA_DIR`; each can be overridden individually.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// Token → table map file.
    pub table_mapping_file: PathBuf,

    /// PIN → table map file.
    pub table_pin_file: PathBuf,

    /// Order collection file.
    pub orders_file: PathBuf,

    /// Mission log written by the delivery robot.
    pub mission_log_file: PathBuf,

    /// Port the menu frontend listens on.
    pub frontend_port: u16,

    /// Frontend base URL used when no LAN address is found.
    pub frontend_url: String,

    /// How long a resolved frontend URL stays cached.
    pub frontend_url_ttl: Duration,

    /// Allowed CORS origins. Empty means any origin.
    pub cors_allowed_origins: Vec<String>,

    /// Log output format.
    pub log_format: LogFormat,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()?;

        let data_dir = PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| ".".to_string()));
        let table_mapping_file = data_path(&data_dir, "TABLE_MAPPING_FILE", "table-mapping.json");
        let table_pin_file = data_path(&data_dir, "TABLE_PIN_FILE", "table-pins.json");
        let orders_file = data_path(&data_dir, "ORDERS_FILE", "qr_menu_orders.json");
        let mission_log_file = data_path(&data_dir, "MISSION_LOG_FILE", "mission_log.json");

        let frontend_port = parse_env("FRONTEND_PORT", 9111);
        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| format!("http://192.168.0.137:{frontend_port}"));
        let frontend_url_ttl = Duration::from_secs(parse_env("FRONTEND_URL_CACHE_TTL_SECS", 30));

        let cors_allowed_origins = parse_list("CORS_ALLOWED_ORIGINS");
        let log_format = match std::env::var("LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            table_mapping_file,
            table_pin_file,
            orders_file,
            mission_log_file,
            frontend_port,
            frontend_url,
            frontend_url_ttl,
            cors_allowed_origins,
            log_format,
        })
    }
}

/// Resolves a file setting: the variable's value if set, otherwise
/// `default_name` under `data_dir`.
fn data_path(data_dir: &Path, key: &str, default_name: &str) -> PathBuf {
    std::env::var(key).map_or_else(|_| data_dir.join(default_name), PathBuf::from)
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Splits a comma-separated variable, dropping blank entries.
fn parse_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
