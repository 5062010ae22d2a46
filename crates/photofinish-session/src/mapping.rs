//! Timeline mapping between race time and video time.
//!
//! Race time: seconds since the race-start instant. Video time: seconds
//! since the recording's first frame. The two are related by a single
//! signed offset — a pure affine mapping with no scale factor, which
//! assumes no relative clock drift across one race's duration.
//!
//! [`Timeline`] is an immutable snapshot of the session fields the
//! mapping needs. Every "now"-dependent read takes the instant as an
//! explicit argument, so all of this is testable without a live clock.
//! Each derived quantity is written as a decision table so the
//! precedence (manual override > wall-clock derivation > unavailable)
//! is visible and testable on its own.

use photofinish_core::Wallclock;

use crate::session::SessionRecord;

/// Signed seconds from `a` to `b`.
fn secs_between(a: Wallclock, b: Wallclock) -> f64 {
    (b - a).num_microseconds().unwrap_or(i64::MAX) as f64 / 1_000_000.0
}

/// Snapshot of one session's timing state.
///
/// Cheap to build; take a fresh one after any session mutation. The
/// mapping may therefore change between snapshots (operator
/// recalibration), but never underneath a caller holding one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    race_start: Option<Wallclock>,
    video_start: Option<Wallclock>,
    video_stop: Option<Wallclock>,
    manual_offset: Option<f64>,
    race_duration_override: Option<f64>,
    video_duration_secs: Option<f64>,
    has_asset: bool,
}

impl Timeline {
    /// Snapshot the timing fields of a session.
    ///
    /// `has_asset` reports whether a recorded video file actually exists;
    /// without one no race-time position has video, whatever the anchors
    /// say.
    pub fn from_session(session: &SessionRecord, has_asset: bool) -> Self {
        Self {
            race_start: session.race_start,
            video_start: session.video_start,
            video_stop: session.video_stop,
            manual_offset: session.video_start_offset,
            race_duration_override: session.race_duration_secs,
            video_duration_secs: session.video_duration_secs,
            has_asset,
        }
    }

    /// Length of the race in seconds.
    ///
    /// | manual override | video stop | race start | result                    |
    /// |-----------------|------------|------------|---------------------------|
    /// | set             | —          | —          | override                  |
    /// | —               | set        | set        | video_stop − race_start   |
    /// | —               | —          | set        | now − race_start          |
    /// | —               | —          | —          | unavailable               |
    pub fn race_duration(&self, now: Wallclock) -> Option<f64> {
        if let Some(duration) = self.race_duration_override {
            return Some(duration);
        }
        let race_start = self.race_start?;
        match self.video_stop {
            Some(stop) => Some(secs_between(race_start, stop)),
            None => Some(secs_between(race_start, now)),
        }
    }

    /// Race-time position of the video's first frame. Negative when the
    /// recording started before the race.
    ///
    /// | manual offset | video start | race start | result                     |
    /// |---------------|-------------|------------|----------------------------|
    /// | set           | —           | —          | offset (authoritative)     |
    /// | —             | set         | set        | video_start − race_start   |
    /// | —             | otherwise   |            | unavailable                |
    pub fn video_start_in_race(&self) -> Option<f64> {
        if let Some(offset) = self.manual_offset {
            return Some(offset);
        }
        match (self.race_start, self.video_start) {
            (Some(race_start), Some(video_start)) => Some(secs_between(race_start, video_start)),
            _ => None,
        }
    }

    /// Race-time position of the video's last frame.
    ///
    /// | video duration | start-in-race | video stop + race start | result                   |
    /// |----------------|---------------|-------------------------|--------------------------|
    /// | known          | known         | —                       | start + duration         |
    /// | unknown        | —             | both set                | video_stop − race_start  |
    /// | otherwise      |               |                         | unavailable              |
    pub fn video_end_in_race(&self) -> Option<f64> {
        if let Some(duration) = self.video_duration_secs {
            return Some(self.video_start_in_race()? + duration);
        }
        match (self.race_start, self.video_stop) {
            (Some(race_start), Some(stop)) => Some(secs_between(race_start, stop)),
            _ => None,
        }
    }

    /// Whether recorded video exists at race time `t`.
    pub fn is_video_available(&self, race_time_secs: f64) -> bool {
        if !self.has_asset {
            return false;
        }
        match (self.video_start_in_race(), self.video_end_in_race()) {
            (Some(start), Some(end)) => race_time_secs >= start && race_time_secs <= end,
            _ => false,
        }
    }

    /// Map a race time to a video time.
    ///
    /// The result is deliberately unclamped: callers must treat values
    /// outside `[0, video duration]` as "no video at this position", and
    /// should consult [`Self::is_video_available`] first.
    pub fn video_time(&self, race_time_secs: f64) -> Option<f64> {
        Some(race_time_secs - self.video_start_in_race()?)
    }

    /// Map a video time back to a race time.
    pub fn race_time(&self, video_time_secs: f64) -> Option<f64> {
        Some(video_time_secs + self.video_start_in_race()?)
    }
}
