//! Session ownership and mutation.
//!
//! The controller is the single owner of the session record: every
//! mutation happens synchronously through it on the UI thread, so no
//! observer ever sees a partially updated event. Observers subscribe to
//! a channel of [`SessionEvent`] notifications instead of reaching into
//! shared mutable state.

use crossbeam_channel::{unbounded, Receiver, Sender};
use photofinish_core::{PhotoFinishError, Result, Wallclock};
use photofinish_media::VideoAsset;
use photofinish_session::{FinishEvent, LaneStatus, SessionRecord, StatusMark, Timeline};
use tracing::info;

/// Notification of one committed session mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    RaceStarted { at: Wallclock },
    VideoStarted { at: Wallclock },
    VideoStopped { at: Wallclock },
    RecordingAttached { duration_secs: f64 },
    OffsetAdjusted { offset_secs: f64 },
    MarkerPlaced { label: String, race_time_secs: f64 },
    StatusSet { label: String, status: LaneStatus },
    LaneCleared { label: String },
    ImageExported { path: String },
    SessionReset,
}

/// Whether the operator confirmed replacing an existing finish event.
///
/// The confirmation itself is a UI concern; this type carries its result
/// through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// No confirmation given — replacing an existing event is an error.
    Deny,
    /// The operator explicitly confirmed the overwrite.
    Confirm,
}

/// Exclusive owner of one race's [`SessionRecord`].
pub struct SessionController {
    session: SessionRecord,
    asset: Option<VideoAsset>,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl SessionController {
    /// Take ownership of a session record.
    pub fn new(session: SessionRecord) -> Self {
        Self {
            session,
            asset: None,
            subscribers: Vec::new(),
        }
    }

    /// Read access to the owned record.
    pub fn session(&self) -> &SessionRecord {
        &self.session
    }

    /// The recorded asset, once capture handed one over.
    pub fn asset(&self) -> Option<&VideoAsset> {
        self.asset.as_ref()
    }

    /// Snapshot the current timeline mapping.
    pub fn timeline(&self) -> Timeline {
        Timeline::from_session(&self.session, self.asset.is_some())
    }

    /// Register an observer. Disconnected receivers are dropped on the
    /// next notification.
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    // ── Race & capture lifecycle ────────────────────────────────

    /// Start the race timer.
    pub fn start_race(&mut self, now: Wallclock) -> Result<()> {
        self.session.start_race(now)?;
        info!(race = %self.session.race_name, "race started");
        self.emit(SessionEvent::RaceStarted { at: now });
        Ok(())
    }

    /// Capture collaborator callback: recording began.
    pub fn video_started(&mut self, at: Wallclock) {
        self.session.record_video_start(at);
        self.emit(SessionEvent::VideoStarted { at });
    }

    /// Capture collaborator callback: recording ended.
    pub fn video_stopped(&mut self, at: Wallclock) {
        self.session.record_video_stop(at);
        self.emit(SessionEvent::VideoStopped { at });
    }

    /// Attach the finished recording. Reads the container duration once
    /// into the session, as the single source for video length.
    pub fn attach_recording(&mut self, asset: VideoAsset) {
        let duration = asset.duration_secs();
        self.session.set_video_duration(duration);
        self.asset = Some(asset);
        self.emit(SessionEvent::RecordingAttached {
            duration_secs: duration,
        });
    }

    /// Operator drag-calibration of the race→video offset.
    pub fn adjust_video_start(&mut self, offset_secs: f64) {
        self.session.adjust_video_start_in_race(offset_secs);
        self.emit(SessionEvent::OffsetAdjusted { offset_secs });
    }

    /// Set or clear the manual race-length override.
    pub fn set_race_duration(&mut self, secs: Option<f64>) {
        self.session.set_race_duration(secs);
    }

    // ── Finish events ───────────────────────────────────────────

    /// Place a finish marker for a lane at a race-time position.
    ///
    /// The overwrite gate runs before any mutation: a lane that already
    /// has an event is only replaced with [`Overwrite::Confirm`]. The
    /// video time is bound at creation, and only when the position falls
    /// inside the recorded span.
    pub fn place_marker(
        &mut self,
        label: &str,
        race_time_secs: f64,
        overwrite: Overwrite,
    ) -> Result<()> {
        self.check_overwrite(label, overwrite)?;

        let event = FinishEvent::finished(label, race_time_secs, None);
        let timeline = self.timeline();
        let video_time = timeline
            .is_video_available(event.race_time_secs)
            .then(|| timeline.video_time(event.race_time_secs))
            .flatten();
        let event = FinishEvent {
            video_time_secs: video_time,
            ..event
        };

        let race_time = event.race_time_secs;
        self.session.upsert_event(event)?;
        self.emit(SessionEvent::MarkerPlaced {
            label: label.to_string(),
            race_time_secs: race_time,
        });
        Ok(())
    }

    /// Record a status-only outcome (DNS/DNF/DSQ) for a lane.
    pub fn set_lane_status(
        &mut self,
        label: &str,
        mark: StatusMark,
        overwrite: Overwrite,
    ) -> Result<()> {
        self.check_overwrite(label, overwrite)?;

        let event = FinishEvent::status_only(label, mark);
        let status = event.status;
        self.session.upsert_event(event)?;
        self.emit(SessionEvent::StatusSet {
            label: label.to_string(),
            status,
        });
        Ok(())
    }

    /// Remove one lane's event.
    pub fn clear_lane(&mut self, label: &str) {
        if self.session.clear_lane(label) {
            self.emit(SessionEvent::LaneCleared {
                label: label.to_string(),
            });
        }
    }

    /// Record a successfully written export.
    pub fn record_export(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.session.record_exported_image(path.clone());
        self.emit(SessionEvent::ImageExported { path });
    }

    /// Full reset back to a fresh record (roster and name survive).
    pub fn reset(&mut self) {
        self.session.reset();
        self.asset = None;
        self.emit(SessionEvent::SessionReset);
    }

    fn check_overwrite(&self, label: &str, overwrite: Overwrite) -> Result<()> {
        if self.session.finish_event(label).is_some() && overwrite == Overwrite::Deny {
            return Err(PhotoFinishError::AmbiguousLaneOverwrite {
                label: label.to_string(),
            });
        }
        Ok(())
    }
}
