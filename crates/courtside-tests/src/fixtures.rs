//! Synthetic clips and detections shared by the integration tests.

use courtside_analysis::{MatchDetections, Scene};
use courtside_core::{FrameBuffer, Homography, Vec2};

pub const WIDTH: u32 = 960;
pub const HEIGHT: u32 = 540;

/// Net reference line produced by [`keypoints`].
pub const NET_Y: f32 = 350.0;

/// Every frame gets its own blue level so order mistakes show up.
pub fn clip(frame_count: usize) -> Vec<FrameBuffer> {
    (0..frame_count)
        .map(|i| FrameBuffer::solid(WIDTH, HEIGHT, [3, 10, (i * 10) as u8, 255]))
        .collect()
}

/// 14 court keypoints with the net landmarks (6 and 11) on [`NET_Y`].
pub fn keypoints() -> Vec<Vec2> {
    (0..14)
        .map(|i| {
            let y = if i == 6 || i == 11 { NET_Y } else { 100.0 };
            Vec2::new(100.0 + 50.0 * i as f32, y)
        })
        .collect()
}

/// One scene over the whole clip, keypoints and ball everywhere, and an
/// identity homography on the first `calibrated` frames.
pub fn detections(
    frame_count: usize,
    calibrated: usize,
    ball: Vec2,
    bounces: &[usize],
) -> MatchDetections {
    MatchDetections {
        ball_track: vec![Some(ball); frame_count],
        keypoints: vec![Some(keypoints()); frame_count],
        homographies: (0..frame_count)
            .map(|i| (i < calibrated).then_some(Homography::IDENTITY))
            .collect(),
        bounces: bounces.iter().copied().collect(),
        scenes: Some(vec![Scene::new(0, frame_count)]),
    }
}

pub fn pixel(frame: &FrameBuffer, x: i32, y: i32) -> [u8; 4] {
    frame.pixel(x, y).unwrap_or([0, 0, 0, 0])
}
