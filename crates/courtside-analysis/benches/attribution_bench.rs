//! Benchmarks for the side-hit attribution pass.
//!
//! Run with: cargo bench -p courtside-analysis

use courtside_analysis::{classify_scenes, HitAttributor, MatchDetections, Scene, TrackabilityConfig};
use courtside_core::{Homography, Vec2};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// One hour at 30 fps with a bounce every 45 frames.
fn hour_of_tennis() -> (usize, MatchDetections) {
    let frames = 108_000;
    let keypoints: Vec<Vec2> = (0..14).map(|i| Vec2::new(i as f32 * 50.0, 350.0)).collect();
    let detections = MatchDetections {
        ball_track: (0..frames)
            .map(|i| (i % 7 != 0).then(|| Vec2::new(640.0, (i % 720) as f32)))
            .collect(),
        keypoints: (0..frames).map(|i| (i % 11 != 0).then(|| keypoints.clone())).collect(),
        homographies: (0..frames).map(|i| (i % 3 != 0).then_some(Homography::IDENTITY)).collect(),
        bounces: (0..frames).step_by(45).collect(),
        scenes: None,
    };
    (frames, detections)
}

fn bench_forward_pass(c: &mut Criterion) {
    let (frames, detections) = hour_of_tennis();

    c.bench_function("attribution_forward_pass_1hr", |bencher| {
        bencher.iter(|| HitAttributor::run(black_box(frames), black_box(&detections)));
    });
}

fn bench_trackability(c: &mut Criterion) {
    let (frames, detections) = hour_of_tennis();
    let scenes: Vec<Scene> = (0..frames)
        .step_by(300)
        .map(|s| Scene::new(s, (s + 300).min(frames)))
        .collect();
    let config = TrackabilityConfig::default();

    c.bench_function("classify_360_scenes", |bencher| {
        bencher.iter(|| classify_scenes(black_box(&scenes), black_box(&detections), &config));
    });
}

criterion_group!(benches, bench_forward_pass, bench_trackability);
criterion_main!(benches);
