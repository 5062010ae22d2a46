//! Benchmarks for timeline mapping operations.
//!
//! Run with: cargo bench -p photofinish-session

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use photofinish_session::{FinishEvent, SessionRecord, Timeline};

fn anchored_session() -> SessionRecord {
    let mut session = SessionRecord::default();
    session
        .start_race(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
        .unwrap();
    session.record_video_start(Utc.timestamp_opt(1_700_000_002, 500_000_000).unwrap());
    session.set_video_duration(600.0);
    session
}

fn bench_mapping(c: &mut Criterion) {
    let session = anchored_session();
    let timeline = Timeline::from_session(&session, true);

    c.bench_function("video_time", |bencher| {
        bencher.iter(|| timeline.video_time(black_box(42.125)));
    });

    c.bench_function("is_video_available", |bencher| {
        bencher.iter(|| timeline.is_video_available(black_box(42.125)));
    });

    c.bench_function("snapshot_from_session", |bencher| {
        bencher.iter(|| Timeline::from_session(black_box(&session), true));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let mut session = SessionRecord::new(
        "Bench Race",
        (1..=8).map(|n| format!("Lane {n}")).collect(),
    );
    for n in 1..=8 {
        session
            .upsert_event(FinishEvent::finished(
                format!("Lane {n}"),
                10.0 + n as f64 * 0.321,
                None,
            ))
            .unwrap();
    }

    c.bench_function("ranking_8_lanes", |bencher| {
        bencher.iter(|| photofinish_session::ranking(black_box(&session)));
    });
}

criterion_group!(benches, bench_mapping, bench_ranking);
criterion_main!(benches);
