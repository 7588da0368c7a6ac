//! Outbound payloads. Owned values, detached from the track store.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::tracker::{Occupancy, TrackId, Visit};

/// One completed visit, sent once per `Entered -> Exited` transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub id: TrackId,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    /// Dwell in seconds
    pub wait_time: f64,
    /// Occupancy was at or above capacity when the visit ended
    #[serde(serialize_with = "flag_as_int")]
    pub alert: bool,
}

impl VisitRecord {
    pub fn new(id: TrackId, visit: &Visit, alert: bool) -> Self {
        Self {
            id,
            entry_time: visit.entry,
            exit_time: visit.exit,
            wait_time: visit.dwell_seconds(),
            alert,
        }
    }
}

fn flag_as_int<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

/// Session-wide counters, regenerated every frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub entered: u64,
    pub exited: u64,
    pub inside: u64,
    /// Sum of all completed dwell times, seconds
    pub total_wait_time: f64,
    /// `total_wait_time / exited`, 0 before the first exit
    pub average_wait_time: f64,
    pub is_crowded: bool,
    /// Tracks currently held by the session
    pub current_people: usize,
    pub max_limit: u64,
    pub ts: DateTime<Utc>,
}

impl AggregateStats {
    pub fn collect(
        occupancy: &Occupancy,
        total_wait_time: f64,
        current_people: usize,
        ts: DateTime<Utc>,
    ) -> Self {
        let exited = occupancy.exited();
        let average_wait_time = if exited > 0 {
            total_wait_time / exited as f64
        } else {
            0.0
        };
        Self {
            entered: occupancy.entered(),
            exited,
            inside: occupancy.inside(),
            total_wait_time,
            average_wait_time,
            is_crowded: occupancy.is_over_capacity(),
            current_people,
            max_limit: occupancy.capacity_limit(),
            ts,
        }
    }
}

/// Unit of work for the background workers.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    Visit(VisitRecord),
    Snapshot(AggregateStats),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_visit_wire_format() {
        let entry = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let visit = Visit {
            entry,
            exit: entry + chrono::Duration::milliseconds(12_500),
            dwell: Duration::from_millis(12_500),
        };

        let value = serde_json::to_value(VisitRecord::new(TrackId(7), &visit, true)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "entryTime": "2025-03-01T09:30:00Z",
                "exitTime": "2025-03-01T09:30:12.500Z",
                "waitTime": 12.5,
                "alert": 1,
            })
        );
    }

    #[test]
    fn test_stats_average_and_wire_names() {
        let mut occ = Occupancy::new(3);
        for _ in 0..3 {
            occ.record_entry();
        }
        occ.record_exit();
        occ.record_exit();

        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let stats = AggregateStats::collect(&occ, 30.0, 4, ts);
        assert_eq!(stats.inside, 1);
        assert_eq!(stats.average_wait_time, 15.0);
        assert!(!stats.is_crowded);

        let value = serde_json::to_value(&stats).unwrap();
        for key in [
            "entered",
            "exited",
            "inside",
            "total_wait_time",
            "average_wait_time",
            "is_crowded",
            "current_people",
            "max_limit",
            "ts",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_stats_average_before_first_exit() {
        let stats = AggregateStats::collect(&Occupancy::new(3), 0.0, 0, Utc::now());
        assert_eq!(stats.average_wait_time, 0.0);
    }
}
