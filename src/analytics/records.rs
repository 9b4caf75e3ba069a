//! Typed records of the robot's mission log.
//!
//! The log is produced by the robot stack, not by this service. Every field
//! is optional on the wire and falls back to a neutral default.

use serde::{Deserialize, Deserializer};

/// Reads a field that may be explicitly `null`, falling back to the type's
/// default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One delivery or navigation run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MissionRecord {
    /// Mission identifier. Repeated entries for one id are collapsed.
    #[serde(deserialize_with = "nullable")]
    pub mission_id: String,
    /// Outcome text, e.g. `COMPLETED`, `FAILED`, `FAILED_GOAL_UNREACHABLE`.
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    /// Whether the mission carried an order to a table.
    #[serde(deserialize_with = "nullable")]
    pub is_delivery: bool,
    /// Start time in one of the formats accepted by
    /// [`super::timestamp::parse_log_timestamp`].
    #[serde(deserialize_with = "nullable")]
    pub start_time: String,
    /// Distance driven, in metres.
    #[serde(deserialize_with = "nullable")]
    pub total_distance_m: f64,
    /// Time spent moving, in seconds.
    #[serde(deserialize_with = "nullable")]
    pub moving_time_sec: f64,
    /// Time spent stationary, in seconds.
    #[serde(deserialize_with = "nullable")]
    pub idle_time_sec: f64,
    /// Wall-clock duration, in seconds.
    #[serde(deserialize_with = "nullable")]
    pub total_duration_sec: f64,
}

impl MissionRecord {
    /// Returns `true` if the mission finished successfully.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("COMPLETED")
    }

    /// Returns `true` if the mission ended in any failure state.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status.to_ascii_uppercase().contains("FAIL")
    }

    /// Returns `true` for failures caused by an unreachable or rejected goal.
    #[must_use]
    pub fn is_goal_failure(&self) -> bool {
        self.is_failed() && self.status.to_ascii_lowercase().contains("goal")
    }
}

/// One continuous operating period of the robot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionRecord {
    /// Session identifier.
    #[serde(deserialize_with = "nullable")]
    pub session_id: String,
    /// Session length, in seconds.
    #[serde(deserialize_with = "nullable")]
    pub session_duration_sec: f64,
}

/// Brake engage/disengage event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BrakeEvent {
    /// Event time.
    #[serde(deserialize_with = "nullable")]
    pub timestamp: String,
    /// `true` when the brake engaged, `false` when released.
    #[serde(deserialize_with = "nullable")]
    pub engaged: bool,
}

/// Emergency-stop state change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmergencyEvent {
    /// Event time.
    #[serde(deserialize_with = "nullable")]
    pub timestamp: String,
    /// `true` while the emergency stop is pressed.
    #[serde(deserialize_with = "nullable")]
    pub active: bool,
}

/// Battery telemetry sample.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BatterySample {
    /// Sample time.
    #[serde(deserialize_with = "nullable")]
    pub timestamp: String,
    /// Pack voltage, when reported.
    pub voltage: Option<f64>,
    /// Explicit event marker emitted by the battery monitor.
    pub event: Option<String>,
}

/// The complete mission log.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MissionDataset {
    /// Missions in log order.
    #[serde(deserialize_with = "nullable")]
    pub missions: Vec<MissionRecord>,
    /// Operating sessions.
    #[serde(deserialize_with = "nullable")]
    pub sessions: Vec<SessionRecord>,
    /// Brake events.
    #[serde(deserialize_with = "nullable")]
    pub brake_events: Vec<BrakeEvent>,
    /// Emergency-stop events.
    #[serde(deserialize_with = "nullable")]
    pub emergency_events: Vec<EmergencyEvent>,
    /// Battery samples.
    #[serde(deserialize_with = "nullable")]
    pub battery: Vec<BatterySample>,
}

impl MissionDataset {
    /// Returns missions collapsed by `mission_id`, first occurrence winning.
    ///
    /// Missions without an id are never collapsed with each other.
    #[must_use]
    pub fn unique_missions(&self) -> Vec<&MissionRecord> {
        let mut seen = std::collections::HashSet::new();
        self.missions
            .iter()
            .filter(|m| m.mission_id.is_empty() || seen.insert(m.mission_id.as_str()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn mission(id: &str, status: &str) -> MissionRecord {
        MissionRecord {
            mission_id: id.to_string(),
            status: status.to_string(),
            ..MissionRecord::default()
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let dataset = MissionDataset {
            missions: vec![
                mission("m1", "COMPLETED"),
                mission("m1", "FAILED"),
                mission("m2", "FAILED"),
            ],
            ..MissionDataset::default()
        };
        let unique = dataset.unique_missions();
        assert_eq!(unique.len(), 2);
        assert!(unique.first().is_some_and(|m| m.is_completed()));
    }

    #[test]
    fn missions_without_id_are_kept() {
        let dataset = MissionDataset {
            missions: vec![mission("", "COMPLETED"), mission("", "COMPLETED")],
            ..MissionDataset::default()
        };
        assert_eq!(dataset.unique_missions().len(), 2);
    }

    #[test]
    fn status_classification() {
        assert!(mission("a", "completed").is_completed());
        assert!(mission("a", "FAILED").is_failed());
        assert!(!mission("a", "FAILED").is_goal_failure());
        assert!(mission("a", "FAILED_GOAL_UNREACHABLE").is_goal_failure());
        assert!(!mission("a", "CANCELLED").is_failed());
    }

    #[test]
    fn partial_log_deserializes_with_defaults() {
        let json = r#"{"missions":[{"mission_id":"m1","is_delivery":true}]}"#;
        let Ok(dataset) = serde_json::from_str::<MissionDataset>(json) else {
            panic!("partial log should parse");
        };
        assert!(dataset.sessions.is_empty());
        let Some(first) = dataset.missions.first() else {
            panic!("one mission expected");
        };
        assert!(first.is_delivery);
        assert_eq!(first.total_distance_m, 0.0);
    }

    #[test]
    fn explicit_nulls_deserialize_as_defaults() {
        let json = r#"{
            "missions": [{"mission_id": "m1", "status": null, "is_delivery": null,
                          "start_time": null, "idle_time_sec": null, "moving_time_sec": 12.5}],
            "sessions": [{"session_id": null, "session_duration_sec": null}],
            "brake_events": [{"timestamp": null, "engaged": null}],
            "emergency_events": null,
            "battery": [{"timestamp": null, "voltage": null}]
        }"#;
        let Ok(dataset) = serde_json::from_str::<MissionDataset>(json) else {
            panic!("nulls should not reject the log");
        };
        let Some(mission) = dataset.missions.first() else {
            panic!("mission should be present");
        };
        assert_eq!(mission.status, "");
        assert!(!mission.is_delivery);
        assert!(mission.idle_time_sec.abs() < f64::EPSILON);
        assert!((mission.moving_time_sec - 12.5).abs() < f64::EPSILON);
        assert!(dataset.emergency_events.is_empty());
        assert_eq!(dataset.sessions.len(), 1);
        assert_eq!(dataset.battery.first().and_then(|b| b.voltage), None);
    }
}
