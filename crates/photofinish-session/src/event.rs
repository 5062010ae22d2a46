//! Finish event types.

use photofinish_core::round_to_millis;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a lane in one race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneStatus {
    /// Entered but no outcome recorded yet.
    Registered,
    /// Crossed the line; the event carries a race time.
    Finished,
    /// Did not start.
    DidNotStart,
    /// Started but did not finish.
    DidNotFinish,
    /// Disqualified.
    Disqualified,
}

impl LaneStatus {
    /// Whether this status participates in the finishing order.
    #[inline]
    pub fn is_ranked(self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Short result-sheet code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Registered => "",
            Self::Finished => "FIN",
            Self::DidNotStart => "DNS",
            Self::DidNotFinish => "DNF",
            Self::Disqualified => "DSQ",
        }
    }
}

/// A status set directly by the operator, without a timeline marker.
///
/// `Finished` is deliberately absent: a finished status can only come
/// from placing a marker, which is what gives it a meaningful time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusMark {
    DidNotStart,
    DidNotFinish,
    Disqualified,
}

impl From<StatusMark> for LaneStatus {
    fn from(mark: StatusMark) -> Self {
        match mark {
            StatusMark::DidNotStart => Self::DidNotStart,
            StatusMark::DidNotFinish => Self::DidNotFinish,
            StatusMark::Disqualified => Self::Disqualified,
        }
    }
}

/// One lane's recorded outcome for one race.
///
/// Events are immutable once created; any change is a full replacement
/// keyed by lane label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishEvent {
    /// Unique event ID
    pub id: Uuid,
    /// Lane identity — the stable join key to the roster
    pub label: String,
    /// Race-relative finish time in seconds, millisecond precision
    pub race_time_secs: f64,
    /// Video-relative finish time; present only when the race-time
    /// position fell inside the recorded span at marker creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_time_secs: Option<f64>,
    /// Lane outcome
    pub status: LaneStatus,
}

impl FinishEvent {
    /// Create a finish event from a timeline marker placement.
    pub fn finished(
        label: impl Into<String>,
        race_time_secs: f64,
        video_time_secs: Option<f64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            race_time_secs: round_to_millis(race_time_secs),
            video_time_secs,
            status: LaneStatus::Finished,
        }
    }

    /// Create a status-only event (DNS/DNF/DSQ): zero race time, no
    /// video time.
    pub fn status_only(label: impl Into<String>, mark: StatusMark) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            race_time_secs: 0.0,
            video_time_secs: None,
            status: mark.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_rounds_to_millis() {
        let event = FinishEvent::finished("Lane 1", 12.34549, Some(4.2));
        assert_eq!(event.race_time_secs, 12.345);
        assert_eq!(event.status, LaneStatus::Finished);
        assert_eq!(event.video_time_secs, Some(4.2));
    }

    #[test]
    fn test_status_only_has_zero_time() {
        let event = FinishEvent::status_only("Lane 2", StatusMark::DidNotStart);
        assert_eq!(event.race_time_secs, 0.0);
        assert_eq!(event.video_time_secs, None);
        assert_eq!(event.status, LaneStatus::DidNotStart);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(LaneStatus::Finished.code(), "FIN");
        assert_eq!(LaneStatus::DidNotStart.code(), "DNS");
        assert_eq!(LaneStatus::DidNotFinish.code(), "DNF");
        assert_eq!(LaneStatus::Disqualified.code(), "DSQ");
        assert!(LaneStatus::Finished.is_ranked());
        assert!(!LaneStatus::Disqualified.is_ranked());
    }
}
