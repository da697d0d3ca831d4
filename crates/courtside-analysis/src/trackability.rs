//! Scene trackability classification.
//!
//! A scene is worth visualizing only when most of its frames carry a court
//! homography; partially calibrated scenes are passed through untouched.

use crate::detections::{MatchDetections, Scene};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Keeps the rate finite for zero-length scenes.
const RATE_EPSILON: f64 = 1e-15;

/// Configuration for scene classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackabilityConfig {
    /// A scene is trackable when its calibrated-frame rate is strictly above this (default: 0.5).
    pub min_track_rate: f64,
}

impl Default for TrackabilityConfig {
    fn default() -> Self {
        Self {
            min_track_rate: 0.5,
        }
    }
}

/// How a scene is rendered in the scene visualization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneClass {
    /// Trail, keypoints and court projection are drawn.
    Trackable,
    /// Frames are emitted unmodified.
    PassThrough,
}

/// Classification result for one scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneReport {
    pub scene: Scene,
    /// Frames of the scene with a homography.
    pub tracked_frames: usize,
    /// `tracked_frames / len`, 0 for an empty scene.
    pub track_rate: f64,
    pub class: SceneClass,
}

impl SceneReport {
    #[inline]
    pub fn is_trackable(&self) -> bool {
        self.class == SceneClass::Trackable
    }
}

/// Classify one scene by the fraction of its frames with a homography.
pub fn classify_scene(
    scene: Scene,
    detections: &MatchDetections,
    config: &TrackabilityConfig,
) -> SceneReport {
    let tracked_frames = (scene.start..scene.end)
        .filter(|&i| detections.homography(i).is_some())
        .count();
    let track_rate = tracked_frames as f64 / (scene.len() as f64).max(RATE_EPSILON);

    let class = if track_rate > config.min_track_rate {
        SceneClass::Trackable
    } else {
        SceneClass::PassThrough
    };

    debug!(
        start = scene.start,
        end = scene.end,
        tracked_frames,
        track_rate,
        ?class,
        "Scene classified"
    );

    SceneReport {
        scene,
        tracked_frames,
        track_rate,
        class,
    }
}

/// Classify every scene, preserving order.
pub fn classify_scenes(
    scenes: &[Scene],
    detections: &MatchDetections,
    config: &TrackabilityConfig,
) -> Vec<SceneReport> {
    scenes
        .iter()
        .map(|&scene| classify_scene(scene, detections, config))
        .collect()
}
