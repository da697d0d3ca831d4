//! Courtside Analysis - event derivation from per-frame detections.
//!
//! Turns the outputs of the external detectors (ball track, court keypoints,
//! court homographies, bounce frames) into match events:
//! - Net reference line per frame
//! - Pixel to canonical court projection
//! - Scene trackability classification
//! - Side-hit attribution with running counters
//! - Scene-cut fallback when no scene list is supplied

pub mod attribution;
pub mod detections;
pub mod geometry;
pub mod scene_detect;
pub mod trackability;

pub use attribution::{
    AttributionSummary, BounceEvent, FrameAttribution, HitAttributor, Side, SideCounters,
    SkipReason, SkippedBounce,
};
pub use detections::{BounceSet, DetectionFile, KeypointSet, MatchDetections, Scene};
pub use geometry::{compute_reference_line, project_to_court, MIN_KEYPOINTS, NET_KEYPOINTS};
pub use scene_detect::{detect_scene_cuts, scenes_from_cuts, SceneCut, SceneDetectConfig};
pub use trackability::{classify_scene, classify_scenes, SceneClass, SceneReport, TrackabilityConfig};
