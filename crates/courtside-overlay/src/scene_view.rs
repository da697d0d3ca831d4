//! Scene visualization: ball trail, keypoints and the bounce court map.
//!
//! Trackable scenes are redrawn from the unannotated input frames; every
//! other scene is emitted as a plain copy.

use crate::draw::{draw_circle, draw_rect, to_pixel, Stroke};
use crate::error::RenderResult;
use crate::overlay::OverlayConfig;
use crate::text::{draw_text, TextStyle};
use courtside_analysis::{project_to_court, MatchDetections, SceneReport};
use courtside_core::{FrameBuffer, Rect, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A bounce drawn on a scene's court map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BounceMark {
    pub frame: usize,
    /// Position in canonical court space.
    pub court: Vec2,
}

/// Output of one scene.
#[derive(Debug, Clone)]
pub struct SceneRender {
    pub report: SceneReport,
    pub frames: Vec<FrameBuffer>,
    /// Court map with this scene's bounces, trackable scenes only.
    pub court_map: Option<FrameBuffer>,
    pub marks: Vec<BounceMark>,
}

/// Render one classified scene from the input frames.
///
/// `court_base` is the blank canonical court image; it is cloned for
/// trackable scenes and left untouched.
pub fn render_scene(
    frames: &[FrameBuffer],
    report: &SceneReport,
    detections: &MatchDetections,
    court_base: &FrameBuffer,
    config: &OverlayConfig,
) -> SceneRender {
    let range = report.scene.frames(frames.len());

    if !report.is_trackable() {
        return SceneRender {
            report: *report,
            frames: frames[range].to_vec(),
            court_map: None,
            marks: Vec::new(),
        };
    }

    let mut court = court_base.clone();
    let mut marks = Vec::new();
    let mut out = Vec::with_capacity(range.len());

    for i in range {
        let mut frame = frames[i].clone();
        if let Err(e) = draw_scene_frame(&mut frame, i, detections, config) {
            warn!(frame = i + 1, error = %e, "Scene overlay failed, emitting frame as drawn");
        }
        match mark_bounce(&mut court, i, detections, config) {
            Ok(Some(mark)) => marks.push(mark),
            Ok(None) => {}
            Err(e) => warn!(frame = i + 1, error = %e, "Could not mark bounce on court map"),
        }
        out.push(frame);
    }

    debug!(
        start = report.scene.start,
        end = report.scene.end,
        bounces = marks.len(),
        "Scene rendered"
    );

    SceneRender {
        report: *report,
        frames: out,
        court_map: Some(court),
        marks,
    }
}

/// Trail or ball marker, then the court keypoints.
fn draw_scene_frame(
    frame: &mut FrameBuffer,
    i: usize,
    detections: &MatchDetections,
    config: &OverlayConfig,
) -> RenderResult<()> {
    if let Some(ball) = detections.ball(i) {
        if !config.draw_trace {
            draw_circle(
                frame,
                ball,
                config.trail_radius,
                Stroke::Outline(2),
                config.ball_color,
            )?;
            draw_ball_label(frame, ball, config)?;
        } else if config.trace_length > 0 {
            for past in (0..=i).rev().take(config.trace_length) {
                let Some(p) = detections.ball(past) else {
                    continue;
                };
                let drawn = draw_circle(
                    frame,
                    p,
                    config.trail_radius,
                    Stroke::Filled,
                    config.trail_color,
                );
                match drawn {
                    Ok(()) => {}
                    // An unplottable earlier position only shortens the trail.
                    Err(e) if past != i => {
                        debug!(frame = i + 1, from = past + 1, error = %e, "Trail point skipped")
                    }
                    Err(e) => return Err(e),
                }
            }
            let size = config.ball_box_size as f32;
            let rect = Rect::from_center_size(ball, Vec2::splat(size));
            draw_rect(frame, rect, 2, config.ball_color)?;
            draw_ball_label(frame, ball, config)?;
        }
    }

    if let Some(keypoints) = detections.keypoints(i) {
        for &kp in keypoints {
            draw_circle(
                frame,
                kp,
                config.keypoint_radius,
                Stroke::Filled,
                config.keypoint_color,
            )?;
        }
    }
    Ok(())
}

fn draw_ball_label(frame: &mut FrameBuffer, ball: Vec2, config: &OverlayConfig) -> RenderResult<()> {
    let (x, y) = to_pixel("ball", ball)?;
    let style = TextStyle {
        scale: config.ball_label_scale,
        color: config.ball_color,
    };
    draw_text(frame, "ball", (x.saturating_add(20), y.saturating_add(20)), style)
}

/// Project a bounce into court space and dot it on the map.
///
/// Needs a ball and a homography on the bounce frame.
fn mark_bounce(
    court: &mut FrameBuffer,
    i: usize,
    detections: &MatchDetections,
    config: &OverlayConfig,
) -> RenderResult<Option<BounceMark>> {
    if !detections.is_bounce(i) {
        return Ok(None);
    }
    let Some(ball) = detections.ball(i) else {
        return Ok(None);
    };
    let Some(point) = project_to_court(ball, detections.homography(i)) else {
        debug!(frame = i, "Bounce not projected: no usable homography");
        return Ok(None);
    };

    draw_circle(
        court,
        point,
        config.bounce_radius,
        Stroke::Filled,
        config.bounce_color,
    )?;
    Ok(Some(BounceMark {
        frame: i,
        court: point,
    }))
}
