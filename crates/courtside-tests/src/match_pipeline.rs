//! End-to-end runs of the two-pass annotation pipeline.
//!
//! Exercises courtside-analysis attribution and trackability through the
//! courtside-overlay compositor, and hands the result to courtside-media.

use crate::fixtures::{clip, detections, keypoints, pixel, NET_Y};
use courtside_analysis::{
    compute_reference_line, HitAttributor, Scene, SceneClass, SideCounters, SkipReason,
};
use courtside_core::{FrameRate, Homography, Vec2};
use courtside_media::{EncodeConfig, ExportJob};
use courtside_overlay::{
    BounceMark, OverlayConfig, Pipeline, PipelineConfig, PipelineOutput, COURT_REFERENCE,
};

const BALL_ABOVE_NET: Vec2 = Vec2::new(480.0, 300.0);

fn run(frame_count: usize, calibrated: usize, bounces: &[usize]) -> PipelineOutput {
    let frames = clip(frame_count);
    let det = detections(frame_count, calibrated, BALL_ABOVE_NET, bounces);
    let scenes = det.scenes.clone().unwrap_or_default();
    Pipeline::default().run(&frames, &scenes, &det)
}

// ── Trackable scene ────────────────────────────────────────────

#[test]
fn calibrated_majority_scene_is_trackable() {
    let output = run(10, 6, &[4]);
    assert_eq!(output.scene_reports.len(), 1);
    let report = output.scene_reports[0];
    assert_eq!(report.class, SceneClass::Trackable);
    assert_eq!(report.tracked_frames, 6);
    assert!((report.track_rate - 0.6).abs() < 1e-12);
}

#[test]
fn bounce_above_net_counts_for_top_side() {
    let det = detections(10, 6, BALL_ABOVE_NET, &[4]);
    let mut attributor = HitAttributor::new();
    let counters: Vec<SideCounters> = (0..10).map(|i| attributor.step(i, &det).counters).collect();

    for c in &counters[..4] {
        assert_eq!(*c, SideCounters { top: 0, bottom: 0 });
    }
    for c in &counters[4..] {
        assert_eq!(*c, SideCounters { top: 1, bottom: 0 });
    }

    let output = run(10, 6, &[4]);
    assert_eq!(output.counters(), SideCounters { top: 1, bottom: 0 });
}

#[test]
fn output_is_annotated_pass_then_scene_pass() {
    let frames = clip(10);
    let output = run(10, 6, &[4]);
    assert_eq!(output.frames.len(), 20);
    assert_eq!(output.annotated_len, 10);

    // Pass 1 carries the net line; pass 2 starts again from the source frames.
    let net = OverlayConfig::default().net_line_color.to_rgba8();
    assert_eq!(pixel(&output.annotated()[0], 480, NET_Y as i32), net);
    assert_ne!(pixel(&output.scene_frames()[0], 480, NET_Y as i32), net);
    for (i, frame) in output.scene_frames().iter().enumerate() {
        assert_ne!(frame, &frames[i], "trackable frame {i} was not drawn on");
        assert_eq!(pixel(frame, 5, 5), pixel(&frames[i], 5, 5));
    }
}

#[test]
fn bounce_is_marked_on_court_map() {
    let output = run(10, 6, &[4]);
    assert_eq!(output.court_maps.len(), 1);
    let map = &output.court_maps[0];
    assert_eq!(
        map.marks,
        vec![BounceMark {
            frame: 4,
            court: BALL_ABOVE_NET,
        }]
    );
    let bounce = OverlayConfig::default().bounce_color.to_rgba8();
    assert_eq!(pixel(&map.image, 480, 300), bounce);
}

#[test]
fn bounce_without_homography_is_counted_but_not_mapped() {
    // Frame 8 is uncalibrated: the hit still counts, the court map stays blank.
    let output = run(10, 6, &[8]);
    assert_eq!(output.counters(), SideCounters { top: 1, bottom: 0 });
    assert!(output.court_maps[0].marks.is_empty());
}

#[test]
fn solved_homography_places_bounce_inside_court() {
    // Broadcast view of the doubles court: a trapezoid symmetric about x = 480.
    let pixel_corners = [
        Vec2::new(330.0, 120.0),
        Vec2::new(630.0, 120.0),
        Vec2::new(780.0, 480.0),
        Vec2::new(180.0, 480.0),
    ];
    let (tl, br) = (COURT_REFERENCE.baseline_top.0, COURT_REFERENCE.baseline_bottom.1);
    let court_corners = [
        Vec2::new(tl.0 as f32, tl.1 as f32),
        Vec2::new(br.0 as f32, tl.1 as f32),
        Vec2::new(br.0 as f32, br.1 as f32),
        Vec2::new(tl.0 as f32, br.1 as f32),
    ];
    let h = Homography::from_correspondences(&pixel_corners, &court_corners).unwrap();

    let mut det = detections(10, 10, BALL_ABOVE_NET, &[4]);
    det.homographies = vec![Some(h); 10];
    let output = Pipeline::default().run(&clip(10), &[Scene::new(0, 10)], &det);

    let mark = output.court_maps[0].marks[0];
    let center_x = (tl.0 + br.0) as f32 / 2.0;
    assert!((mark.court.x - center_x).abs() < 0.5, "{:?}", mark.court);
    assert!(mark.court.y > tl.1 as f32 && mark.court.y < br.1 as f32);
    let bounce = OverlayConfig::default().bounce_color.to_rgba8();
    assert_eq!(
        pixel(&output.court_maps[0].image, mark.court.x as i32, mark.court.y as i32),
        bounce
    );
}

// ── Pass-through scenes ────────────────────────────────────────

#[test]
fn sparse_calibration_passes_frames_through() {
    let frames = clip(10);
    let output = run(10, 3, &[]);
    assert_eq!(output.scene_reports[0].class, SceneClass::PassThrough);
    assert_eq!(output.scene_frames(), frames.as_slice());
    assert!(output.court_maps.is_empty());
}

#[test]
fn half_calibrated_scene_is_not_trackable() {
    let output = run(10, 5, &[]);
    assert_eq!(output.scene_reports[0].class, SceneClass::PassThrough);
    assert_eq!(output.scene_reports[0].track_rate, 0.5);
}

// ── Missing detections ─────────────────────────────────────────

#[test]
fn bounce_without_ball_leaves_counters() {
    let mut det = detections(10, 6, BALL_ABOVE_NET, &[4]);
    det.ball_track[4] = None;
    let frames = clip(10);
    let output = Pipeline::default().run(&frames, &[Scene::new(0, 10)], &det);

    assert_eq!(output.counters(), SideCounters::default());
    assert_eq!(output.attribution.skipped.len(), 1);
    assert_eq!(output.attribution.skipped[0].reason, SkipReason::NoBall);
}

#[test]
fn short_keypoint_set_has_no_net_line() {
    let short = &keypoints()[..5];
    assert_eq!(compute_reference_line(Some(short)), None);

    let mut det = detections(4, 4, BALL_ABOVE_NET, &[]);
    for k in det.keypoints.iter_mut() {
        *k = Some(short.to_vec());
    }
    let frames = clip(4);
    let output = Pipeline::default().run(&frames, &[Scene::new(0, 4)], &det);
    for (annotated, source) in output.annotated().iter().zip(&frames) {
        assert_eq!(pixel(annotated, 480, NET_Y as i32), pixel(source, 480, NET_Y as i32));
    }
}

// ── Degenerate detections ──────────────────────────────────────

#[test]
fn far_ball_coordinate_fails_only_its_frame() {
    let mut det = detections(4, 4, BALL_ABOVE_NET, &[1]);
    det.ball_track[1] = Some(Vec2::new(1.0e30, 40.0));
    let frames = clip(4);
    let output = Pipeline::default().run(&frames, &[Scene::new(0, 4)], &det);

    assert_eq!(output.frames.len(), 8);
    assert_eq!(output.counters(), SideCounters { top: 1, bottom: 0 });
    assert!(output.court_maps[0].marks.is_empty());
    assert_eq!(output.scene_frames()[1], frames[1]);
    assert_ne!(output.scene_frames()[2], frames[2]);
}

#[test]
fn near_singular_homography_on_bounce_is_not_mapped() {
    let mut det = detections(4, 4, BALL_ABOVE_NET, &[1]);
    det.homographies[1] = Some(Homography::from_rows([
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0e-7],
    ]));
    let frames = clip(4);
    let output = Pipeline::default().run(&frames, &[Scene::new(0, 4)], &det);

    assert_eq!(output.frames.len(), 8);
    assert_eq!(output.counters(), SideCounters { top: 1, bottom: 0 });
    assert_eq!(output.court_maps.len(), 1);
    assert!(output.court_maps[0].marks.is_empty());
    assert_eq!(output.court_maps[0].image, COURT_REFERENCE.court_image());
}

// ── Determinism ────────────────────────────────────────────────

#[test]
fn runs_are_deterministic() {
    let first = run(10, 6, &[2, 4, 7]);
    let second = run(10, 6, &[2, 4, 7]);
    assert_eq!(first.frames, second.frames);
    assert_eq!(first.attribution, second.attribution);
    assert_eq!(first.scene_reports, second.scene_reports);
}

#[test]
fn serial_and_parallel_scene_rendering_agree() {
    let frames = clip(10);
    let mut det = detections(10, 10, BALL_ABOVE_NET, &[3, 6]);
    det.scenes = Some(vec![
        Scene::new(0, 5),
        Scene::new(5, 10),
    ]);
    let scenes = det.scenes.clone().unwrap_or_default();

    let parallel = Pipeline::default().run(&frames, &scenes, &det);
    let serial = Pipeline::new(PipelineConfig {
        parallel_scenes: false,
        ..Default::default()
    })
    .run(&frames, &scenes, &det);
    assert_eq!(parallel.frames, serial.frames);
    assert_eq!(parallel.court_maps.len(), 2);
}

// ── Export handoff ─────────────────────────────────────────────

#[test]
fn pipeline_output_is_exportable() {
    let output = run(10, 6, &[4]);
    let job = ExportJob::for_frames(
        "match_annotated.mp4",
        &output.frames,
        FrameRate::FPS_30,
        EncodeConfig::default(),
    )
    .unwrap();
    let args = job.ffmpeg_args();
    assert!(args.contains(&"960x540".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("match_annotated.mp4"));
}
