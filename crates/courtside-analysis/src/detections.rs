//! Per-frame detector outputs and their JSON sidecar file.
//!
//! The detectors run out of process; their results arrive as one JSON
//! document per clip:
//! ```text
//! {
//!   "version": 1,
//!   "frame_count": 240,
//!   "detections": {
//!     "ball_track":   [[640.0, 300.5], null, ...],
//!     "keypoints":    [[[286.0, 561.0], ...], null, ...],
//!     "homographies": [[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], null, ...],
//!     "bounces":      [12, 57],
//!     "scenes":       [[0, 120], [120, 240]]
//!   }
//! }
//! ```

use courtside_core::{CourtsideError, Homography, Result, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, warn};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Court landmarks detected in one frame, in pixel space.
pub type KeypointSet = Vec<Vec2>;

/// A contiguous shot: frames `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Scene {
    pub start: usize,
    pub end: usize,
}

impl Scene {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of frames in the scene (0 for an inverted interval).
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frame indices of the scene, clipped to `frame_count`.
    pub fn frames(&self, frame_count: usize) -> Range<usize> {
        let end = self.end.min(frame_count);
        self.start.min(end)..end
    }
}

impl From<(usize, usize)> for Scene {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

impl From<Scene> for (usize, usize) {
    fn from(scene: Scene) -> Self {
        (scene.start, scene.end)
    }
}

/// Frame indices flagged as ball bounces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BounceSet(BTreeSet<usize>);

impl BounceSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, frame: usize) -> bool {
        self.0.contains(&frame)
    }

    pub fn insert(&mut self, frame: usize) -> bool {
        self.0.insert(frame)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bounce frames in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for BounceSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Everything the detectors reported for a clip, indexed by frame.
///
/// Accessors treat frames beyond the end of a per-frame list as "nothing
/// detected", so a short list never panics the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchDetections {
    /// Ball center per frame.
    pub ball_track: Vec<Option<Vec2>>,
    /// Court keypoints per frame.
    pub keypoints: Vec<Option<KeypointSet>>,
    /// Pixel to canonical court transform per frame.
    pub homographies: Vec<Option<Homography>>,
    /// Bounce frames.
    pub bounces: BounceSet,
    /// Shot boundaries, when the producer ran scene detection.
    pub scenes: Option<Vec<Scene>>,
}

impl MatchDetections {
    /// Ball position in frame `i`.
    #[inline]
    pub fn ball(&self, i: usize) -> Option<Vec2> {
        self.ball_track.get(i).copied().flatten()
    }

    /// Court keypoints in frame `i`.
    #[inline]
    pub fn keypoints(&self, i: usize) -> Option<&[Vec2]> {
        self.keypoints.get(i).and_then(|k| k.as_deref())
    }

    /// Court homography of frame `i`.
    #[inline]
    pub fn homography(&self, i: usize) -> Option<&Homography> {
        self.homographies.get(i).and_then(Option::as_ref)
    }

    #[inline]
    pub fn is_bounce(&self, i: usize) -> bool {
        self.bounces.contains(i)
    }

    /// Pad or truncate every per-frame list to `frame_count`.
    ///
    /// Mismatched lengths usually mean the detectors ran on a different decode
    /// of the clip; the overlay still renders, so this only warns.
    pub fn normalize(&mut self, frame_count: usize) {
        fit_len("ball_track", &mut self.ball_track, frame_count);
        fit_len("keypoints", &mut self.keypoints, frame_count);
        fit_len("homographies", &mut self.homographies, frame_count);

        let late: Vec<usize> = self.bounces.iter().filter(|&b| b >= frame_count).collect();
        if !late.is_empty() {
            warn!(?late, frame_count, "Dropping bounce frames past the end of the clip");
            self.bounces = self.bounces.iter().filter(|&b| b < frame_count).collect();
        }
    }
}

fn fit_len<T>(name: &str, list: &mut Vec<Option<T>>, frame_count: usize) {
    if list.len() != frame_count {
        warn!(
            list = name,
            len = list.len(),
            frame_count,
            "Per-frame detections do not match frame count"
        );
        list.resize_with(frame_count, || None);
    }
}

/// Versioned detection sidecar file.
#[derive(Debug, Serialize, Deserialize)]
pub struct DetectionFile {
    /// Schema version.
    pub version: u32,
    /// Frame count the detectors saw.
    pub frame_count: usize,
    /// The detections.
    pub detections: MatchDetections,
}

impl DetectionFile {
    /// Wrap detections for writing.
    pub fn new(frame_count: usize, detections: MatchDetections) -> Self {
        Self {
            version: CURRENT_VERSION,
            frame_count,
            detections,
        }
    }

    /// Deserialize from JSON bytes.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let file: Self = serde_json::from_slice(data).map_err(|e| {
            CourtsideError::Serialization(format!("Failed to parse detections: {}", e))
        })?;

        if file.version > CURRENT_VERSION {
            return Err(CourtsideError::Serialization(format!(
                "Detection file version {} is newer than supported version {}",
                file.version, CURRENT_VERSION
            )));
        }
        debug!(
            version = file.version,
            frames = file.frame_count,
            bounces = file.detections.bounces.len(),
            "Parsed detection file"
        );
        Ok(file)
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            CourtsideError::Serialization(format!("Failed to serialize detections: {}", e))
        })
    }

    /// Load from a file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CourtsideError::NotFound(format!(
                "Detection file not found: {}",
                path.display()
            )));
        }
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Save to a file path.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
