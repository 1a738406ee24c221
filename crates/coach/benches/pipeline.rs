//! Per-frame pipeline benchmarks
//!
//! Run with: cargo bench --package coach

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::{Duration, Instant};

use coach::{AnalyzerConfig, CprAnalyzer, ManualClock};
use landmarks::{Landmark, LandmarkFrame, LandmarkId};
use smoothing::SmoothingWindow;

/// One second of a rescuer compressing at 110 per minute, 30 frames
fn compression_clip() -> Vec<LandmarkFrame> {
    (0..30)
        .map(|i| {
            let t = i as f64 / 30.0;
            let dy = 0.06 * (2.0 * std::f64::consts::PI * 110.0 / 60.0 * t).sin();
            let mut frame = LandmarkFrame::filled(Landmark::new(0.5, 0.5, 0.0, 0.1)).unwrap();
            let points = [
                (LandmarkId::LeftShoulder, 0.45, 0.35 + dy),
                (LandmarkId::RightShoulder, 0.55, 0.35 + dy),
                (LandmarkId::LeftElbow, 0.47, 0.475 + dy),
                (LandmarkId::RightElbow, 0.53, 0.475 + dy),
                (LandmarkId::LeftWrist, 0.49, 0.60 + dy),
                (LandmarkId::RightWrist, 0.51, 0.60 + dy),
                (LandmarkId::LeftHip, 0.45, 0.70),
                (LandmarkId::RightHip, 0.55, 0.70),
            ];
            for (id, x, y) in points {
                frame.set(id, Landmark::new(x, y, 0.0, 0.95)).unwrap();
            }
            frame
        })
        .collect()
}

fn bench_process_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pipeline");
    group.measurement_time(Duration::from_secs(5));

    let clip = compression_clip();
    let windows = [
        ("frames_5", SmoothingWindow::Frames(5)),
        ("frames_15", SmoothingWindow::Frames(15)),
        ("span_150ms", SmoothingWindow::Span { span_ms: 150, max_frames: 30 }),
    ];

    for (name, window) in windows {
        group.throughput(Throughput::Elements(clip.len() as u64));
        group.bench_with_input(BenchmarkId::new("process_clip", name), &window, |b, window| {
            let config = AnalyzerConfig {
                smoothing: *window,
                ..Default::default()
            };
            let clock = ManualClock::new();
            let mut analyzer = CprAnalyzer::with_clock(config, clock.clone());

            b.iter(|| {
                for frame in &clip {
                    clock.advance(Duration::from_millis(33));
                    black_box(analyzer.process(black_box(frame)));
                }
            });
        });
    }

    group.finish();
}

fn bench_raw_validation(c: &mut Criterion) {
    let clip = compression_clip();
    let raw: Vec<Vec<Landmark>> = clip.into_iter().map(Into::into).collect();
    let start = Instant::now();

    c.bench_function("process_raw_clip", |b| {
        let mut analyzer = CprAnalyzer::with_clock(AnalyzerConfig::default(), ManualClock::new());
        let mut at = start;
        b.iter(|| {
            for landmarks in &raw {
                at += Duration::from_millis(33);
                black_box(analyzer.process_raw_at(landmarks.clone(), at).ok());
            }
        });
    });
}

criterion_group!(benches, bench_process_frame, bench_raw_validation);
criterion_main!(benches);
