//! Fault and error digest for the dashboard alert panel.
//!
//! Each alert category is derived independently. A category with nothing
//! to report produces no alert at all.
//!
//! "Most recent" is the maximum of the raw timestamp strings, not of parsed
//! times; producers must write lexicographically sortable timestamps.

use serde::Serialize;
use utoipa::ToSchema;

use super::records::{MissionDataset, MissionRecord};

/// Battery voltage below which a sample raises an alert.
pub const LOW_BATTERY_VOLTAGE: f64 = 20.0;
/// Mission duration above which a navigation timeout is suspected.
pub const NAVIGATION_TIMEOUT_SECS: f64 = 1800.0;

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational, no action needed soon.
    Low,
    /// Needs attention during the shift.
    Medium,
    /// Needs attention now.
    High,
}

/// One aggregated alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorAlert {
    /// Alert category identifier.
    #[serde(rename = "type")]
    pub alert_type: String,
    /// Human-readable summary.
    pub message: String,
    /// Alert severity.
    pub severity: Severity,
    /// Number of contributing records.
    pub count: usize,
    /// Timestamp of the most recent contributing record.
    pub timestamp: Option<String>,
}

impl ErrorAlert {
    fn new(
        alert_type: &str,
        message: &str,
        severity: Severity,
        count: usize,
        timestamp: Option<&str>,
    ) -> Self {
        Self {
            alert_type: alert_type.to_string(),
            message: message.to_string(),
            severity,
            count,
            timestamp: timestamp.map(str::to_string),
        }
    }
}

/// Builds the error digest from a mission log.
///
/// `missions` must already be deduplicated. Categories are evaluated in a
/// fixed order: brakes, emergency stop, failed missions, goal failures,
/// battery, navigation timeouts.
#[must_use]
pub fn error_digest(dataset: &MissionDataset, missions: &[&MissionRecord]) -> Vec<ErrorAlert> {
    let mut alerts = Vec::new();

    if !dataset.brake_events.is_empty() {
        let latest_engaged = latest(
            dataset
                .brake_events
                .iter()
                .filter(|e| e.engaged)
                .map(|e| e.timestamp.as_str()),
        );
        alerts.push(ErrorAlert::new(
            "brake_events",
            "Brake engaged/disengaged",
            Severity::Medium,
            dataset.brake_events.len(),
            latest_engaged,
        ));
    }

    let active_stops: Vec<&str> = dataset
        .emergency_events
        .iter()
        .filter(|e| e.active)
        .map(|e| e.timestamp.as_str())
        .collect();
    if !active_stops.is_empty() {
        alerts.push(ErrorAlert::new(
            "emergency_stop",
            "Emergency stop activated",
            Severity::High,
            active_stops.len(),
            latest(active_stops.iter().copied()),
        ));
    }

    let failed: Vec<&MissionRecord> = missions.iter().copied().filter(|m| m.is_failed()).collect();
    if !failed.is_empty() {
        alerts.push(ErrorAlert::new(
            "mission_failed",
            "Mission failed",
            Severity::High,
            failed.len(),
            latest(failed.iter().map(|m| m.start_time.as_str())),
        ));
    }

    let goal_failures: Vec<&MissionRecord> =
        failed.iter().copied().filter(|m| m.is_goal_failure()).collect();
    if !goal_failures.is_empty() {
        alerts.push(ErrorAlert::new(
            "goal_failure",
            "Navigation goal could not be reached",
            Severity::High,
            goal_failures.len(),
            latest(goal_failures.iter().map(|m| m.start_time.as_str())),
        ));
    }

    let battery_alerts: Vec<&str> = dataset
        .battery
        .iter()
        .filter(|b| {
            b.voltage.is_some_and(|v| v < LOW_BATTERY_VOLTAGE)
                || b.event.as_deref().is_some_and(|e| !e.is_empty())
        })
        .map(|b| b.timestamp.as_str())
        .collect();
    if !battery_alerts.is_empty() {
        alerts.push(ErrorAlert::new(
            "low_battery",
            "Battery low or battery event reported",
            Severity::Medium,
            battery_alerts.len(),
            latest(battery_alerts.iter().copied()),
        ));
    }

    let long_missions: Vec<&str> = missions
        .iter()
        .filter(|m| m.total_duration_sec > NAVIGATION_TIMEOUT_SECS)
        .map(|m| m.start_time.as_str())
        .collect();
    if !long_missions.is_empty() {
        alerts.push(ErrorAlert::new(
            "navigation_timeout",
            "Mission exceeded 30 minutes (possible navigation timeout)",
            Severity::Low,
            long_missions.len(),
            latest(long_missions.iter().copied()),
        ));
    }

    alerts
}

/// Lexicographic maximum of the given timestamps.
fn latest<'a>(timestamps: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    timestamps.max()
}
