//! The session record: one race, from start to exported stills.

use chrono::Duration;
use photofinish_core::{PhotoFinishError, Result, Wallclock};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::FinishEvent;

/// Default roster size when no lane names are supplied.
pub const DEFAULT_LANE_COUNT: usize = 4;

/// Everything recorded about one race.
///
/// The record is plain data: it keeps its own invariants (at most one
/// event per lane label, race start set once) but knows nothing about
/// confirmation flows or notification — those live in the controller
/// layer that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Race name, also the basis of the session filename
    pub race_name: String,
    /// Ordered lane roster; labels are stable identities, not indexes
    pub lane_names: Vec<String>,
    /// Wall-clock instant the race timer started; set once, cleared only
    /// by a full reset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_start: Option<Wallclock>,
    /// Wall-clock instant recording actually began (capture collaborator)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_start: Option<Wallclock>,
    /// Wall-clock instant recording ended (capture collaborator)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_stop: Option<Wallclock>,
    /// Manual drag-calibrated offset from race start to video start in
    /// seconds; when present it is authoritative over the wall-clock
    /// anchors and is never re-derived from them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_start_offset: Option<f64>,
    /// Manual race-length override in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_duration_secs: Option<f64>,
    /// Video length from container metadata; absent = unknown, not zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_duration_secs: Option<f64>,
    /// At most one event per lane label, in insertion order
    #[serde(default)]
    pub finish_events: Vec<FinishEvent>,
    /// Paths of successfully exported finish images, in export order
    #[serde(default)]
    pub exported_images: Vec<String>,
}

impl SessionRecord {
    /// Create a new session with an explicit roster.
    pub fn new(race_name: impl Into<String>, lane_names: Vec<String>) -> Self {
        Self {
            race_name: race_name.into(),
            lane_names,
            race_start: None,
            video_start: None,
            video_stop: None,
            video_start_offset: None,
            race_duration_secs: None,
            video_duration_secs: None,
            finish_events: Vec::new(),
            exported_images: Vec::new(),
        }
    }

    /// Create a new session with the default `Lane 1..=4` roster.
    pub fn with_default_lanes(race_name: impl Into<String>) -> Self {
        let lanes = (1..=DEFAULT_LANE_COUNT)
            .map(|n| format!("Lane {n}"))
            .collect();
        Self::new(race_name, lanes)
    }

    /// Start the race timer. Fails if the race already started; only a
    /// full [`reset`](Self::reset) makes the anchor writable again.
    pub fn start_race(&mut self, now: Wallclock) -> Result<()> {
        if self.race_start.is_some() {
            return Err(PhotoFinishError::InvalidParameter(
                "race already started".into(),
            ));
        }
        self.race_start = Some(now);
        Ok(())
    }

    /// Capture collaborator callback: recording began.
    pub fn record_video_start(&mut self, at: Wallclock) {
        self.video_start = Some(at);
    }

    /// Capture collaborator callback: recording ended.
    pub fn record_video_stop(&mut self, at: Wallclock) {
        self.video_stop = Some(at);
    }

    /// Store the video length read once from container metadata.
    pub fn set_video_duration(&mut self, secs: f64) {
        self.video_duration_secs = Some(secs);
    }

    /// Set or clear the manual race-length override.
    pub fn set_race_duration(&mut self, secs: Option<f64>) {
        self.race_duration_secs = secs;
    }

    /// Operator drag-calibration: set the manual race→video offset.
    ///
    /// The wall-clock `video_start` is recomputed for display consistency
    /// when the race start is known, but the manual offset — not the
    /// wall-clock fields — remains the source of truth for all
    /// subsequent timeline reads.
    pub fn adjust_video_start_in_race(&mut self, new_offset: f64) {
        self.video_start_offset = Some(new_offset);
        if let Some(race_start) = self.race_start {
            self.video_start =
                Some(race_start + Duration::microseconds((new_offset * 1_000_000.0).round() as i64));
        }
        debug!(offset = new_offset, "manual timeline offset set");
    }

    /// Look up the finish event for a lane label.
    pub fn finish_event(&self, label: &str) -> Option<&FinishEvent> {
        self.finish_events.iter().find(|e| e.label == label)
    }

    /// Whether the label belongs to the roster.
    pub fn is_known_lane(&self, label: &str) -> bool {
        self.lane_names.iter().any(|l| l == label)
    }

    /// Roster position of a lane label.
    pub fn lane_index(&self, label: &str) -> Option<usize> {
        self.lane_names.iter().position(|l| l == label)
    }

    /// Insert or replace the event for its lane label.
    ///
    /// Replacement is remove-then-reinsert — events are never partially
    /// edited — which preserves the at-most-one-per-label invariant. The
    /// overwrite confirmation gate belongs to the caller (controller),
    /// not here.
    pub fn upsert_event(&mut self, event: FinishEvent) -> Result<()> {
        if !self.is_known_lane(&event.label) {
            return Err(PhotoFinishError::NotFound(format!(
                "lane '{}' is not in the roster",
                event.label
            )));
        }
        self.finish_events.retain(|e| e.label != event.label);
        self.finish_events.push(event);
        Ok(())
    }

    /// Remove the event for one lane. Returns whether anything was removed.
    pub fn clear_lane(&mut self, label: &str) -> bool {
        let before = self.finish_events.len();
        self.finish_events.retain(|e| e.label != label);
        self.finish_events.len() != before
    }

    /// Remove all finish events.
    pub fn clear_events(&mut self) {
        self.finish_events.clear();
    }

    /// Record a successfully written export.
    pub fn record_exported_image(&mut self, path: impl Into<String>) {
        self.exported_images.push(path.into());
    }

    /// Full reset: drop anchors, overrides, events, and export history.
    /// Name and roster survive.
    pub fn reset(&mut self) {
        self.race_start = None;
        self.video_start = None;
        self.video_stop = None;
        self.video_start_offset = None;
        self.race_duration_secs = None;
        self.video_duration_secs = None;
        self.finish_events.clear();
        self.exported_images.clear();
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::with_default_lanes("Untitled Race")
    }
}
