//! Hourly and daily mission histograms.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use utoipa::ToSchema;

use super::records::MissionRecord;
use super::timestamp::parse_log_timestamp;

/// Hours covered by the hourly histogram window.
pub const HOURLY_WINDOW_HOURS: i64 = 24;
/// Days covered by the daily histogram.
pub const DAILY_WINDOW_DAYS: u32 = 7;

/// Deliveries started during one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct HourlyBucket {
    /// Hour of day, `0..=23`.
    pub hour: u32,
    /// Number of deliveries.
    pub count: u32,
}

/// Missions started on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DailyBucket {
    /// Calendar date.
    pub date: NaiveDate,
    /// Short label for charts, e.g. `Jan 05`.
    pub label: String,
    /// Number of missions.
    pub count: u32,
}

/// Counts deliveries per hour of day over the `hours` preceding `now`.
///
/// Only missions with `is_delivery` and a parseable start time inside
/// `[now - hours, now]` are counted. All 24 hours are returned, in order.
#[must_use]
pub fn hourly_histogram(
    missions: &[&MissionRecord],
    now: NaiveDateTime,
    hours: i64,
) -> Vec<HourlyBucket> {
    let mut counts = [0u32; 24];
    let window_start = now - Duration::hours(hours);
    for mission in missions.iter().filter(|m| m.is_delivery) {
        let Some(start) = parse_log_timestamp(&mission.start_time) else {
            tracing::debug!(mission_id = %mission.mission_id, "skipping unparseable start time");
            continue;
        };
        if start < window_start || start > now {
            continue;
        }
        if let Some(slot) = counts.get_mut(start.hour() as usize) {
            *slot = slot.saturating_add(1);
        }
    }
    (0u32..)
        .zip(counts)
        .map(|(hour, count)| HourlyBucket { hour, count })
        .collect()
}

/// Returns the busiest hour; ties resolve to the earliest hour.
#[must_use]
pub fn peak_hour(buckets: &[HourlyBucket]) -> u32 {
    buckets
        .iter()
        .fold(None::<&HourlyBucket>, |best, bucket| match best {
            Some(b) if b.count >= bucket.count => Some(b),
            _ => Some(bucket),
        })
        .map_or(0, |b| b.hour)
}

/// Counts missions per calendar day for the `days` days ending today.
///
/// Missions with a parseable start time inside `[now - days, now]` are
/// counted. Buckets are zero-filled and ordered oldest first; the last
/// bucket is today.
#[must_use]
pub fn daily_histogram(
    missions: &[&MissionRecord],
    now: NaiveDateTime,
    days: u32,
) -> Vec<DailyBucket> {
    let today = now.date();
    let window_start = now - Duration::days(i64::from(days));
    let mut buckets: Vec<DailyBucket> = (0..days)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(i64::from(offset));
            DailyBucket {
                date,
                label: date.format("%b %d").to_string(),
                count: 0,
            }
        })
        .collect();

    for mission in missions {
        let Some(start) = parse_log_timestamp(&mission.start_time) else {
            continue;
        };
        if start < window_start || start > now {
            continue;
        }
        if let Some(bucket) = buckets.iter_mut().find(|b| b.date == start.date()) {
            bucket.count = bucket.count.saturating_add(1);
        }
    }
    buckets
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn at(raw: &str) -> NaiveDateTime {
        let Some(t) = parse_log_timestamp(raw) else {
            panic!("bad fixture timestamp {raw}");
        };
        t
    }

    fn delivery(id: &str, start: &str) -> MissionRecord {
        MissionRecord {
            mission_id: id.to_string(),
            status: "COMPLETED".to_string(),
            is_delivery: true,
            start_time: start.to_string(),
            ..MissionRecord::default()
        }
    }

    #[test]
    fn single_delivery_lands_in_its_hour() {
        let m = delivery("m1", "2024-01-01 02:00:00 PM");
        let buckets = hourly_histogram(&[&m], at("2024-01-01 03:00:00 PM"), 24);
        assert_eq!(buckets.len(), 24);
        for bucket in &buckets {
            let expected = u32::from(bucket.hour == 14);
            assert_eq!(bucket.count, expected, "hour {}", bucket.hour);
        }
    }

    #[test]
    fn hourly_ignores_non_deliveries_and_out_of_window() {
        let mut not_delivery = delivery("m1", "2024-01-01 14:00:00");
        not_delivery.is_delivery = false;
        let too_old = delivery("m2", "2023-12-30 14:00:00");
        let future = delivery("m3", "2024-01-01 16:00:00");
        let garbage = delivery("m4", "not a time");
        let buckets = hourly_histogram(
            &[&not_delivery, &too_old, &future, &garbage],
            at("2024-01-01 15:00:00"),
            24,
        );
        assert!(buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn peak_hour_prefers_earliest_tie() {
        let a = delivery("a", "2024-01-01 09:10:00");
        let b = delivery("b", "2024-01-01 11:10:00");
        let c = delivery("c", "2024-01-01 11:20:00");
        let d = delivery("d", "2024-01-01 09:40:00");
        let buckets = hourly_histogram(&[&a, &b, &c, &d], at("2024-01-01 12:00:00"), 24);
        assert_eq!(peak_hour(&buckets), 9);
    }

    #[test]
    fn peak_hour_of_empty_histogram_is_zero() {
        let buckets = hourly_histogram(&[], at("2024-01-01 12:00:00"), 24);
        assert_eq!(peak_hour(&buckets), 0);
    }

    #[test]
    fn daily_is_zero_filled_oldest_first() {
        let today = delivery("a", "2024-03-07 08:00:00");
        let two_days_ago = delivery("b", "2024-03-05 20:00:00");
        let buckets = daily_histogram(&[&today, &two_days_ago], at("2024-03-07 12:00:00"), 7);

        assert_eq!(buckets.len(), 7);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Mar 01", "Mar 02", "Mar 03", "Mar 04", "Mar 05", "Mar 06", "Mar 07"]
        );
        let counts: Vec<u32> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, [0, 0, 0, 0, 1, 0, 1]);
    }

    #[test]
    fn daily_counts_non_delivery_missions() {
        let mut patrol = delivery("a", "2024-03-07 08:00:00");
        patrol.is_delivery = false;
        let buckets = daily_histogram(&[&patrol], at("2024-03-07 12:00:00"), 7);
        assert_eq!(buckets.last().map(|b| b.count), Some(1));
    }
}
