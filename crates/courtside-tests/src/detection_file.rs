//! Detection sidecar files feeding the pipeline.

use crate::fixtures::{clip, detections, pixel, NET_Y};
use courtside_analysis::{
    classify_scenes, DetectionFile, HitAttributor, Scene, SceneClass, SideCounters,
    TrackabilityConfig,
};
use courtside_core::Vec2;
use courtside_overlay::{OverlayConfig, Pipeline};

#[test]
fn saved_file_reproduces_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("match.detections.json");
    let det = detections(8, 8, Vec2::new(480.0, 420.0), &[1, 5]);
    DetectionFile::new(8, det.clone()).save_to_file(&path).unwrap();

    let loaded = DetectionFile::load_from_file(&path).unwrap();
    assert_eq!(loaded.frame_count, 8);

    let frames = clip(8);
    let scenes = det.scenes.clone().unwrap_or_default();
    let direct = Pipeline::default().run(&frames, &scenes, &det);
    let reloaded = Pipeline::default().run(&frames, &scenes, &loaded.detections);
    assert_eq!(direct.frames, reloaded.frames);
    assert_eq!(reloaded.counters(), SideCounters { top: 0, bottom: 2 });
}

#[test]
fn short_lists_are_padded_before_rendering() {
    // Detectors saw 3 frames of a 6 frame decode.
    let json = br#"{
        "version": 1,
        "frame_count": 3,
        "detections": {
            "ball_track": [[480.0, 300.0], [482.0, 310.0], [484.0, 320.0]],
            "keypoints": [
                [[100.0, 100.0],[150.0, 100.0],[200.0, 100.0],[250.0, 100.0],[300.0, 100.0],[350.0, 100.0],[400.0, 350.0],
                 [450.0, 100.0],[500.0, 100.0],[550.0, 100.0],[600.0, 100.0],[650.0, 350.0],[700.0, 100.0],[750.0, 100.0]],
                null,
                null
            ],
            "bounces": [0, 4]
        }
    }"#;
    let mut file = DetectionFile::from_json(json).unwrap();
    file.detections.normalize(6);
    assert_eq!(file.detections.ball_track.len(), 6);
    assert!(file.detections.is_bounce(4));

    let frames = clip(6);
    let output = Pipeline::default().run(&frames, &[Scene::new(0, 6)], &file.detections);
    assert_eq!(output.frames.len(), 12);
    // Frame 0 has the net line; frame 1 has no keypoints.
    let net = OverlayConfig::default().net_line_color.to_rgba8();
    assert_eq!(pixel(&output.annotated()[0], 480, NET_Y as i32), net);
    assert_eq!(
        pixel(&output.annotated()[1], 480, NET_Y as i32),
        pixel(&frames[1], 480, NET_Y as i32)
    );
    // Bounce 0 is above the net; bounce 4 has neither ball nor net line.
    assert_eq!(output.counters(), SideCounters { top: 1, bottom: 0 });
    assert_eq!(output.attribution.skipped.len(), 1);
    // No homographies at all.
    assert_eq!(output.scene_reports[0].class, SceneClass::PassThrough);
}

#[test]
fn counting_without_video_matches_pipeline() {
    let det = detections(12, 9, Vec2::new(480.0, 200.0), &[2, 9]);
    let summary = HitAttributor::run(12, &det);
    let scenes = det.scenes.clone().unwrap_or_default();
    let reports = classify_scenes(&scenes, &det, &TrackabilityConfig::default());

    let frames = clip(12);
    let output = Pipeline::default().run(&frames, &scenes, &det);
    assert_eq!(summary, output.attribution);
    assert_eq!(reports, output.scene_reports);
}
