//! Headline operational metrics derived from the mission log.

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use super::histogram::{
    DAILY_WINDOW_DAYS, HOURLY_WINDOW_HOURS, daily_histogram, hourly_histogram, peak_hour,
};
use super::records::{MissionDataset, MissionRecord};

/// Seconds per hour, for rate conversions.
const SECS_PER_HOUR: f64 = 3600.0;

/// Dashboard headline numbers.
///
/// Every ratio is zero when its denominator is zero.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    /// Completed missions as a percentage of all missions.
    pub success_rate: f64,
    /// Moving time as a percentage of total runtime.
    pub robot_utilization: f64,
    /// Deliveries per hour of runtime.
    pub orders_per_hour: f64,
    /// Average speed while moving, in m/s.
    pub avg_robot_speed: f64,
    /// Total distance in km, rounded to two decimals.
    pub distance_covered: f64,
    /// Hour of day with the most deliveries in the last 24 hours.
    pub peak_busy_hour: u32,
    /// Missions started today.
    pub trips_per_day: u32,
    /// Distinct missions in the log.
    pub total_missions: usize,
    /// Distinct missions that completed.
    pub completed_missions: usize,
    /// Distinct missions that failed.
    pub failed_missions: usize,
    /// Runtime used as the utilization and throughput denominator, in seconds.
    pub total_runtime_sec: f64,
}

/// Running totals over the deduplicated mission set.
#[derive(Debug, Default)]
struct Totals {
    missions: usize,
    completed: usize,
    failed: usize,
    deliveries: usize,
    distance_m: f64,
    moving_sec: f64,
    idle_sec: f64,
}

impl Totals {
    fn from_missions(missions: &[&MissionRecord]) -> Self {
        missions.iter().fold(Self::default(), |mut acc, m| {
            acc.missions += 1;
            acc.completed += usize::from(m.is_completed());
            acc.failed += usize::from(m.is_failed());
            acc.deliveries += usize::from(m.is_delivery);
            acc.distance_m += m.total_distance_m;
            acc.moving_sec += m.moving_time_sec;
            acc.idle_sec += m.idle_time_sec;
            acc
        })
    }
}

/// Computes the headline metrics.
///
/// `missions` must already be deduplicated. Runtime is the sum of session
/// durations when the log has sessions, otherwise moving plus idle time.
#[must_use]
pub fn compute_metrics(
    dataset: &MissionDataset,
    missions: &[&MissionRecord],
    now: NaiveDateTime,
) -> DashboardMetrics {
    let totals = Totals::from_missions(missions);
    let runtime = if dataset.sessions.is_empty() {
        totals.moving_sec + totals.idle_sec
    } else {
        dataset.sessions.iter().map(|s| s.session_duration_sec).sum()
    };

    let hourly = hourly_histogram(missions, now, HOURLY_WINDOW_HOURS);
    let daily = daily_histogram(missions, now, DAILY_WINDOW_DAYS);

    DashboardMetrics {
        success_rate: ratio(totals.completed as f64, totals.missions as f64) * 100.0,
        robot_utilization: ratio(totals.moving_sec, runtime) * 100.0,
        orders_per_hour: ratio(totals.deliveries as f64, runtime) * SECS_PER_HOUR,
        avg_robot_speed: ratio(totals.distance_m, totals.moving_sec),
        distance_covered: round2(totals.distance_m / 1000.0),
        peak_busy_hour: peak_hour(&hourly),
        trips_per_day: daily.last().map_or(0, |b| b.count),
        total_missions: totals.missions,
        completed_missions: totals.completed,
        failed_missions: totals.failed,
        total_runtime_sec: runtime,
    }
}

/// `numerator / denominator`, or zero when the denominator is not positive.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Rounds to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::analytics::records::SessionRecord;
    use crate::analytics::timestamp::parse_log_timestamp;

    fn now() -> NaiveDateTime {
        let Some(t) = parse_log_timestamp("2024-01-01 03:00:00 PM") else {
            panic!("bad fixture");
        };
        t
    }

    fn mission(id: &str, status: &str) -> MissionRecord {
        MissionRecord {
            mission_id: id.to_string(),
            status: status.to_string(),
            ..MissionRecord::default()
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_log_is_all_zero() {
        let dataset = MissionDataset::default();
        let metrics = compute_metrics(&dataset, &[], now());
        assert!(close(metrics.success_rate, 0.0));
        assert!(close(metrics.robot_utilization, 0.0));
        assert!(close(metrics.orders_per_hour, 0.0));
        assert!(close(metrics.avg_robot_speed, 0.0));
        assert_eq!(metrics.total_missions, 0);
        assert_eq!(metrics.trips_per_day, 0);
    }

    #[test]
    fn success_rate_half() {
        let a = mission("a", "COMPLETED");
        let b = mission("b", "FAILED");
        let metrics = compute_metrics(&MissionDataset::default(), &[&a, &b], now());
        assert!(close(metrics.success_rate, 50.0));
        assert_eq!(metrics.failed_missions, 1);
    }

    #[test]
    fn runtime_falls_back_to_moving_plus_idle() {
        let mut a = mission("a", "COMPLETED");
        a.moving_time_sec = 600.0;
        a.idle_time_sec = 1200.0;
        a.total_distance_m = 1234.0;
        a.is_delivery = true;
        let metrics = compute_metrics(&MissionDataset::default(), &[&a], now());
        assert!(close(metrics.total_runtime_sec, 1800.0));
        assert!(close(metrics.robot_utilization, 100.0 / 3.0));
        assert!(close(metrics.orders_per_hour, 2.0));
        assert!(close(metrics.avg_robot_speed, 1234.0 / 600.0));
        assert!(close(metrics.distance_covered, 1.23));
    }

    #[test]
    fn sessions_override_mission_runtime() {
        let mut a = mission("a", "COMPLETED");
        a.moving_time_sec = 900.0;
        a.idle_time_sec = 100.0;
        let dataset = MissionDataset {
            sessions: vec![
                SessionRecord {
                    session_id: "s1".to_string(),
                    session_duration_sec: 3600.0,
                },
                SessionRecord {
                    session_id: "s2".to_string(),
                    session_duration_sec: 0.0,
                },
            ],
            ..MissionDataset::default()
        };
        let metrics = compute_metrics(&dataset, &[&a], now());
        assert!(close(metrics.total_runtime_sec, 3600.0));
        assert!(close(metrics.robot_utilization, 25.0));
    }

    #[test]
    fn peak_hour_and_trips_today() {
        let mut a = mission("a", "COMPLETED");
        a.is_delivery = true;
        a.start_time = "2024-01-01 02:00:00 PM".to_string();
        let metrics = compute_metrics(&MissionDataset::default(), &[&a], now());
        assert_eq!(metrics.peak_busy_hour, 14);
        assert_eq!(metrics.trips_per_day, 1);
    }

    #[test]
    fn distance_rounds_to_two_places() {
        assert!(close(round2(1.005_1), 1.01));
        assert!(close(round2(2.344), 2.34));
    }
}
