//! Duty statuses, timeline events, and the explicit stop-kind tag.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The four FMCSA ELD duty statuses.
///
/// `SleeperBerth` is defined for completeness of [`crate::log_builder`]'s
/// totals row (every status is always a key) but the simulator never emits
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DutyStatus {
    #[serde(rename = "OFF")]
    Off,
    #[serde(rename = "SB")]
    SleeperBerth,
    #[serde(rename = "D")]
    Driving,
    #[serde(rename = "ON")]
    OnDuty,
}

impl fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::Off => "OFF",
            Self::SleeperBerth => "SB",
            Self::Driving => "D",
            Self::OnDuty => "ON",
        };
        write!(f, "{code}")
    }
}

/// Explicit classification of a non-driving event, attached at the point of
/// emission instead of inferred later from the note string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopKind {
    Pickup,
    Dropoff,
    Fuel,
    /// 10-hour off-duty shift reset.
    Rest,
    /// 34-hour off-duty cycle reset.
    Restart,
    /// 30-minute mandatory break.
    Break,
}

impl StopKind {
    /// The wire-format `type` value used in the `/api/plan-trip/` stop
    /// marker list. `Rest` and `Restart` both report `"rest"` — the HTTP
    /// contract does not distinguish them, matching the source.
    pub fn as_wire_str(self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Dropoff => "dropoff",
            Self::Fuel => "fuel",
            Self::Rest | Self::Restart => "rest",
            Self::Break => "break",
        }
    }
}

/// One duty-status event on the simulator's timeline.
///
/// Events are emitted strictly time-ordered and contiguous: for any two
/// consecutive events `a, b` in a timeline, `a.end_time == b.start_time`.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEvent {
    pub status: DutyStatus,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_mins: i64,
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    pub note: String,
    pub day: u32,
    /// `None` for driving events; `Some(_)` for every other event.
    #[serde(skip)]
    pub kind: Option<StopKind>,
}

impl TimelineEvent {
    /// Whether this event represents driving time.
    pub fn is_driving(&self) -> bool {
        self.status == DutyStatus::Driving
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_status_display_matches_eld_codes() {
        assert_eq!(DutyStatus::Off.to_string(), "OFF");
        assert_eq!(DutyStatus::SleeperBerth.to_string(), "SB");
        assert_eq!(DutyStatus::Driving.to_string(), "D");
        assert_eq!(DutyStatus::OnDuty.to_string(), "ON");
    }

    #[test]
    fn stop_kind_collapses_rest_and_restart_on_the_wire() {
        assert_eq!(StopKind::Rest.as_wire_str(), "rest");
        assert_eq!(StopKind::Restart.as_wire_str(), "rest");
        assert_eq!(StopKind::Break.as_wire_str(), "break");
    }
}
