//! Mission analytics engine.
//!
//! A pure function of a [`MissionDataset`] and the current time. Nothing
//! here performs I/O or keeps state between calls; the dashboard recomputes
//! everything from the full log on each request.

pub mod digest;
pub mod histogram;
pub mod metrics;
pub mod records;
pub mod timestamp;

pub use digest::{ErrorAlert, Severity, error_digest};
pub use histogram::{DailyBucket, HourlyBucket, daily_histogram, hourly_histogram, peak_hour};
pub use metrics::{DashboardMetrics, compute_metrics};
pub use records::{
    BatterySample, BrakeEvent, EmergencyEvent, MissionDataset, MissionRecord, SessionRecord,
};
pub use timestamp::parse_log_timestamp;

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use histogram::{DAILY_WINDOW_DAYS, HOURLY_WINDOW_HOURS};

/// Everything the dashboard shows, computed in one pass over the log.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Dashboard {
    /// Headline metrics.
    pub metrics: DashboardMetrics,
    /// Deliveries per hour of day over the last 24 hours.
    pub hourly: Vec<HourlyBucket>,
    /// Missions per day over the last 7 days, oldest first.
    pub daily: Vec<DailyBucket>,
    /// Fault and error alerts.
    pub errors: Vec<ErrorAlert>,
}

/// Computes the full dashboard for `dataset` as seen at `now`.
#[must_use]
pub fn compute_dashboard(dataset: &MissionDataset, now: NaiveDateTime) -> Dashboard {
    let missions = dataset.unique_missions();
    Dashboard {
        metrics: compute_metrics(dataset, &missions, now),
        hourly: hourly_histogram(&missions, now, HOURLY_WINDOW_HOURS),
        daily: daily_histogram(&missions, now, DAILY_WINDOW_DAYS),
        errors: error_digest(dataset, &missions),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        let Some(t) = parse_log_timestamp("2024-01-01 15:00:00") else {
            panic!("bad fixture");
        };
        t
    }

    fn mission(id: &str, status: &str, distance: f64) -> MissionRecord {
        MissionRecord {
            mission_id: id.to_string(),
            status: status.to_string(),
            is_delivery: true,
            start_time: "2024-01-01 14:00:00".to_string(),
            total_distance_m: distance,
            moving_time_sec: 100.0,
            ..MissionRecord::default()
        }
    }

    #[test]
    fn duplicate_missions_count_once_everywhere() {
        let dataset = MissionDataset {
            missions: vec![
                mission("m1", "COMPLETED", 500.0),
                mission("m1", "FAILED", 500.0),
                mission("m2", "FAILED", 1500.0),
            ],
            ..MissionDataset::default()
        };
        let dashboard = compute_dashboard(&dataset, now());
        assert_eq!(dashboard.metrics.total_missions, 2);
        assert!((dashboard.metrics.success_rate - 50.0).abs() < 1e-9);
        assert!((dashboard.metrics.distance_covered - 2.0).abs() < 1e-9);
        assert_eq!(dashboard.hourly.iter().map(|b| b.count).sum::<u32>(), 2);
        assert_eq!(dashboard.daily.last().map(|b| b.count), Some(2));
        let failed = dashboard.errors.iter().find(|a| a.alert_type == "mission_failed");
        assert_eq!(failed.map(|a| a.count), Some(1));
    }

    #[test]
    fn serializes_metrics_in_camel_case() {
        let dashboard = compute_dashboard(&MissionDataset::default(), now());
        let Ok(json) = serde_json::to_value(&dashboard) else {
            panic!("dashboard should serialize");
        };
        let metrics = json.get("metrics");
        assert!(metrics.and_then(|m| m.get("successRate")).is_some());
        assert!(metrics.and_then(|m| m.get("peakBusyHour")).is_some());
        let len_of = |key: &str| json.get(key).and_then(|v| v.as_array()).map(Vec::len);
        assert_eq!(len_of("hourly"), Some(24));
        assert_eq!(len_of("daily"), Some(7));
    }
}
