//! Analytics service: reads the robot's mission log and runs the engine.

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};

use crate::analytics::{Dashboard, MissionDataset, compute_dashboard};
use crate::error::MenuError;

/// Read-only view over the externally written mission log.
///
/// The log is re-read on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    log_path: PathBuf,
}

impl AnalyticsService {
    /// Creates a service reading the log at `log_path`.
    #[must_use]
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    /// Reads and parses the mission log.
    ///
    /// An empty (or whitespace-only) file is an empty dataset.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::MissionLogUnavailable`] if the file is missing,
    /// unreadable, or not a valid mission log.
    pub async fn load_dataset(&self) -> Result<MissionDataset, MenuError> {
        let bytes = tokio::fs::read(&self.log_path).await.map_err(|e| {
            MenuError::MissionLogUnavailable(format!("{}: {e}", self.log_path.display()))
        })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(MissionDataset::default());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            MenuError::MissionLogUnavailable(format!("{}: {e}", self.log_path.display()))
        })
    }

    /// Computes the dashboard as of the local wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::MissionLogUnavailable`] if the log cannot be read.
    pub async fn dashboard(&self) -> Result<Dashboard, MenuError> {
        self.dashboard_at(Local::now().naive_local()).await
    }

    /// Computes the dashboard as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::MissionLogUnavailable`] if the log cannot be read.
    pub async fn dashboard_at(&self, now: NaiveDateTime) -> Result<Dashboard, MenuError> {
        let dataset = self.load_dataset().await?;
        let dashboard = compute_dashboard(&dataset, now);
        tracing::debug!(
            missions = dashboard.metrics.total_missions,
            alerts = dashboard.errors.len(),
            "dashboard computed"
        );
        Ok(dashboard)
    }
}
