//! Scene-cut detection using frame-to-frame pixel differencing.
//!
//! Fallback for detection files that carry no scene list. Hard cuts between
//! broadcast camera angles show up as a jump in mean absolute difference.

use crate::detections::Scene;
use courtside_core::{FrameBuffer, PixelFormat};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A detected hard cut: frame `frame` starts a new scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneCut {
    pub frame: usize,
    /// Mean absolute difference across the cut, 0.0 to 1.0.
    pub confidence: f32,
}

/// Configuration for scene-cut detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDetectConfig {
    /// Mean absolute difference threshold for a cut (default: 0.3).
    pub cut_threshold: f32,
    /// Minimum number of frames between detected cuts (default: 15).
    pub min_scene_frames: usize,
}

impl Default for SceneDetectConfig {
    fn default() -> Self {
        Self {
            cut_threshold: 0.3,
            min_scene_frames: 15,
        }
    }
}

/// Detect hard cuts by comparing consecutive frames.
pub fn detect_scene_cuts(frames: &[FrameBuffer], config: &SceneDetectConfig) -> Vec<SceneCut> {
    if frames.len() < 2 {
        return Vec::new();
    }

    // Step 1: MAD for each consecutive pair
    let diffs: Vec<Option<f32>> = frames
        .par_windows(2)
        .map(|pair| mean_absolute_difference(&pair[0], &pair[1]))
        .collect();

    // Step 2: threshold, suppressing cuts closer than min_scene_frames
    let mut cuts = Vec::new();
    let mut last_cut = 0usize;
    for (i, diff) in diffs.into_iter().enumerate() {
        let frame = i + 1;
        let Some(mad) = diff else {
            warn!(frame, "Skipping frame pair: dimension or format mismatch");
            continue;
        };
        if mad >= config.cut_threshold && frame - last_cut >= config.min_scene_frames {
            debug!(frame, confidence = mad, "Scene cut detected");
            last_cut = frame;
            cuts.push(SceneCut {
                frame,
                confidence: mad.min(1.0),
            });
        }
    }
    cuts
}

/// Turn cut positions into contiguous `[start, end)` scenes covering every frame.
pub fn scenes_from_cuts(cuts: &[SceneCut], frame_count: usize) -> Vec<Scene> {
    let mut scenes = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        if cut.frame > start && cut.frame < frame_count {
            scenes.push(Scene::new(start, cut.frame));
            start = cut.frame;
        }
    }
    if start < frame_count || scenes.is_empty() {
        scenes.push(Scene::new(start, frame_count));
    }
    scenes
}

/// Mean absolute RGB difference between two `Rgba8` frames, 0.0 to 1.0.
///
/// `None` if the frames differ in size or are not `Rgba8`.
fn mean_absolute_difference(a: &FrameBuffer, b: &FrameBuffer) -> Option<f32> {
    if a.width != b.width
        || a.height != b.height
        || a.format != PixelFormat::Rgba8
        || b.format != PixelFormat::Rgba8
    {
        return None;
    }

    let pixel_count = a.width as u64 * a.height as u64;
    if pixel_count == 0 {
        return Some(0.0);
    }

    let (pa, pb) = (a.primary_plane(), b.primary_plane());
    let mut total: u64 = 0;
    for y in 0..a.height {
        for (x, z) in pa.row(y).chunks_exact(4).zip(pb.row(y).chunks_exact(4)) {
            for c in 0..3 {
                total += x[c].abs_diff(z[c]) as u64;
            }
        }
    }

    Some((total as f64 / (pixel_count as f64 * 3.0 * 255.0)) as f32)
}
