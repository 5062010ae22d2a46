//! Integration tests for the race session flow.
//!
//! Exercises the full operator sequence across photofinish-session,
//! photofinish-engine, and photofinish-media: start race → start/stop
//! recording → calibrate → place markers → rank → persist.

use chrono::{Duration, TimeZone, Utc};
use photofinish_core::{PhotoFinishError, Wallclock};
use photofinish_engine::{Overwrite, SessionController, SessionEvent};
use photofinish_media::VideoAsset;
use photofinish_session::{
    ranking, standings, LaneStatus, SessionRecord, SessionStore, StatusMark, Timeline,
};

// ── Helpers ────────────────────────────────────────────────────

fn at(millis: i64) -> Wallclock {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::milliseconds(millis)
}

fn recorded_asset(duration_secs: f64) -> VideoAsset {
    VideoAsset::from_parts(
        "/videos/heat.mp4",
        duration_secs,
        1920,
        1080,
        photofinish_core::FrameRate::FPS_30,
        photofinish_core::MediaTimeBase::new(1, 15360),
    )
}

/// Race starts at t=0, recording runs from +2.0s for 30s.
fn reviewed_controller() -> SessionController {
    let mut controller = SessionController::new(SessionRecord::default());
    controller.start_race(at(0)).unwrap();
    controller.video_started(at(2_000));
    controller.video_stopped(at(32_000));
    controller.attach_recording(recorded_asset(30.0));
    controller
}

// ── Timeline mapping across the stack ──────────────────────────

#[test]
fn race_times_map_onto_video_and_back() {
    crate::init_test_logging();
    let controller = reviewed_controller();
    let timeline = controller.timeline();

    assert_eq!(timeline.video_start_in_race(), Some(2.0));
    assert_eq!(timeline.video_end_in_race(), Some(32.0));

    for race_time in [2.0, 10.5, 31.999] {
        assert!(timeline.is_video_available(race_time));
        let video_time = timeline.video_time(race_time).unwrap();
        let back = timeline.race_time(video_time).unwrap();
        assert!((back - race_time).abs() < 1e-9);
    }
    assert!(!timeline.is_video_available(1.999));
    assert!(!timeline.is_video_available(32.001));
}

#[test]
fn early_recording_yields_negative_offset() {
    let mut controller = SessionController::new(SessionRecord::default());
    // Recording starts 1.5s before the race gun.
    controller.video_started(at(0));
    controller.start_race(at(1_500)).unwrap();
    controller.attach_recording(recorded_asset(30.0));

    let timeline = controller.timeline();
    assert_eq!(timeline.video_start_in_race(), Some(-1.5));
    // The race gun is 1.5 seconds into the footage.
    assert_eq!(timeline.video_time(0.0), Some(1.5));
}

#[test]
fn drag_calibration_overrides_wallclock_derivation() {
    let mut controller = reviewed_controller();
    controller.adjust_video_start(1.75);

    let timeline = controller.timeline();
    assert_eq!(timeline.video_start_in_race(), Some(1.75));

    // Re-inspecting wall-clock anchors must not recompute the offset.
    let session = controller.session();
    assert!(session.race_start.is_some());
    assert!(session.video_start.is_some());
    assert_eq!(
        Timeline::from_session(session, true).video_start_in_race(),
        Some(1.75)
    );
}

// ── Marker placement through ranking ───────────────────────────

#[test]
fn full_review_produces_ranking_and_standings() {
    let mut controller = reviewed_controller();
    controller
        .place_marker("Lane 1", 12.345, Overwrite::Deny)
        .unwrap();
    controller
        .place_marker("Lane 2", 10.001, Overwrite::Deny)
        .unwrap();
    controller
        .set_lane_status("Lane 3", StatusMark::DidNotStart, Overwrite::Deny)
        .unwrap();

    let ranked = ranking(controller.session());
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].label, "Lane 2");
    assert_eq!(ranked[0].race_time_secs, 10.001);
    assert_eq!(ranked[1].label, "Lane 1");

    let all = standings(controller.session());
    assert_eq!(all.len(), 4);
    assert_eq!(all[2].status, LaneStatus::DidNotStart);
    assert_eq!(all[3].status, LaneStatus::Registered);
}

#[test]
fn repeated_overwrites_keep_one_event_per_lane() {
    let mut controller = reviewed_controller();
    controller
        .place_marker("Lane 1", 10.0, Overwrite::Deny)
        .unwrap();
    for time in [10.5, 11.0, 11.5] {
        controller
            .place_marker("Lane 1", time, Overwrite::Confirm)
            .unwrap();
    }
    controller
        .place_marker("Lane 2", 9.0, Overwrite::Deny)
        .unwrap();

    let session = controller.session();
    assert_eq!(session.finish_events.len(), 2);
    assert_eq!(session.finish_event("Lane 1").unwrap().race_time_secs, 11.5);
}

#[test]
fn unconfirmed_overwrite_is_rejected_before_mutation() {
    let mut controller = reviewed_controller();
    controller
        .place_marker("Lane 4", 20.0, Overwrite::Deny)
        .unwrap();

    let result = controller.place_marker("Lane 4", 21.0, Overwrite::Deny);
    assert!(matches!(
        result,
        Err(PhotoFinishError::AmbiguousLaneOverwrite { .. })
    ));
    assert_eq!(
        controller
            .session()
            .finish_event("Lane 4")
            .unwrap()
            .race_time_secs,
        20.0
    );
}

// ── Persistence round trip ─────────────────────────────────────

#[test]
fn reviewed_session_round_trips_through_store() {
    let mut controller = reviewed_controller();
    controller
        .place_marker("Lane 1", 12.345, Overwrite::Deny)
        .unwrap();
    controller
        .place_marker("Lane 2", 10.001, Overwrite::Deny)
        .unwrap();
    controller
        .set_lane_status("Lane 3", StatusMark::Disqualified, Overwrite::Deny)
        .unwrap();
    controller.adjust_video_start(1.9);
    controller.record_export("/exports/Untitled Race-0m12.345.jpg");

    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path());
    store.save(controller.session()).unwrap();

    let loaded = store.load(&controller.session().race_name).unwrap();
    assert_eq!(&loaded, controller.session());

    // The reloaded record drives the identical timeline mapping.
    let timeline = Timeline::from_session(&loaded, true);
    assert_eq!(timeline.video_start_in_race(), Some(1.9));

    // Millisecond-precision times survived the trip.
    assert_eq!(loaded.finish_event("Lane 1").unwrap().race_time_secs, 12.345);
    assert_eq!(loaded.finish_event("Lane 2").unwrap().race_time_secs, 10.001);
    assert_eq!(
        loaded.finish_event("Lane 3").unwrap().status,
        LaneStatus::Disqualified
    );
}

// ── Notification channel ───────────────────────────────────────

#[test]
fn observers_see_the_whole_flow() {
    let mut controller = SessionController::new(SessionRecord::default());
    let rx = controller.subscribe();

    controller.start_race(at(0)).unwrap();
    controller.video_started(at(2_000));
    controller.video_stopped(at(32_000));
    controller.attach_recording(recorded_asset(30.0));
    controller
        .place_marker("Lane 1", 12.0, Overwrite::Deny)
        .unwrap();

    let events: Vec<SessionEvent> = rx.try_iter().collect();
    assert!(matches!(events[0], SessionEvent::RaceStarted { .. }));
    assert!(matches!(events[1], SessionEvent::VideoStarted { .. }));
    assert!(matches!(events[2], SessionEvent::VideoStopped { .. }));
    assert!(matches!(events[3], SessionEvent::RecordingAttached { .. }));
    assert!(matches!(events[4], SessionEvent::MarkerPlaced { .. }));
}
