//! Finishing-order derivation.

use crate::event::LaneStatus;
use crate::session::SessionRecord;

/// One entry in the ranked finishing order.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedLane {
    /// 1-based finishing position
    pub position: usize,
    /// Lane label
    pub label: String,
    /// Finish time in seconds
    pub race_time_secs: f64,
}

/// One roster entry with its current outcome, ranked or not.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneStanding {
    pub label: String,
    pub status: LaneStatus,
    /// Present only for finished lanes
    pub race_time_secs: Option<f64>,
}

/// Derive the finishing order: lanes with `Finished` status, ascending
/// by race time. Equal times tie-break by roster order (lane index
/// ascending) — a documented rule rather than incidental collection
/// order.
pub fn ranking(session: &SessionRecord) -> Vec<RankedLane> {
    let mut finished: Vec<(usize, &str, f64)> = session
        .finish_events
        .iter()
        .filter(|e| e.status.is_ranked())
        .map(|e| {
            (
                session.lane_index(&e.label).unwrap_or(usize::MAX),
                e.label.as_str(),
                e.race_time_secs,
            )
        })
        .collect();

    finished.sort_by(|a, b| {
        a.2.partial_cmp(&b.2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });

    finished
        .into_iter()
        .enumerate()
        .map(|(i, (_, label, time))| RankedLane {
            position: i + 1,
            label: label.to_string(),
            race_time_secs: time,
        })
        .collect()
}

/// Per-lane standings in roster order. Lanes without an event are
/// `Registered`; non-finished lanes stay in the list so the display can
/// show DNS/DNF/DSQ alongside the ranked results.
pub fn standings(session: &SessionRecord) -> Vec<LaneStanding> {
    session
        .lane_names
        .iter()
        .map(|label| match session.finish_event(label) {
            Some(event) => LaneStanding {
                label: label.clone(),
                status: event.status,
                race_time_secs: event.status.is_ranked().then_some(event.race_time_secs),
            },
            None => LaneStanding {
                label: label.clone(),
                status: LaneStatus::Registered,
                race_time_secs: None,
            },
        })
        .collect()
}
