//! Net reference line and court-space projection.

use courtside_core::{Homography, Vec2};
use tracing::debug;

/// Keypoint indices whose mean y approximates the net line.
///
/// Fixed by the court keypoint detector's landmark schema; a detector with a
/// different schema breaks this contract.
pub const NET_KEYPOINTS: (usize, usize) = (6, 11);

/// Keypoint sets shorter than this never yield a reference line.
pub const MIN_KEYPOINTS: usize = 6;

/// Pixel y of the net reference line for one frame.
///
/// `None` when keypoints are absent, shorter than [`MIN_KEYPOINTS`], or lack
/// one of the [`NET_KEYPOINTS`] landmarks.
pub fn compute_reference_line(keypoints: Option<&[Vec2]>) -> Option<f32> {
    let keypoints = keypoints?;
    if keypoints.len() < MIN_KEYPOINTS {
        return None;
    }

    let (a, b) = NET_KEYPOINTS;
    match (keypoints.get(a), keypoints.get(b)) {
        (Some(p), Some(q)) if p.y.is_finite() && q.y.is_finite() => Some((p.y + q.y) / 2.0),
        _ => {
            debug!(len = keypoints.len(), "Net keypoints missing from keypoint set");
            None
        }
    }
}

/// Project a pixel-space point into canonical court coordinates.
///
/// `None` when the frame has no homography or the point maps to infinity.
#[inline]
pub fn project_to_court(point: Vec2, homography: Option<&Homography>) -> Option<Vec2> {
    homography?.project(point)
}
