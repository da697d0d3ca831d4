//! Per-frame annotation: net reference line and running hit counters.

use crate::draw::{draw_line, ensure_drawable};
use crate::error::RenderResult;
use crate::text::{draw_text, text_size, TextStyle};
use courtside_analysis::{FrameAttribution, SideCounters};
use courtside_core::{Color, FrameBuffer, Vec2};
use serde::{Deserialize, Serialize};

/// Styling and layout of every overlay element.
///
/// Colors default to the broadcast look: blue labels, red net line, green
/// ball marker, yellow bounce dots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Horizontal inset of the net line from both frame edges (default: 300).
    pub net_line_inset: u32,
    pub net_line_thickness: u32,
    pub net_line_color: Color,
    pub label_color: Color,
    /// Pixels per glyph cell for frame labels (default: 4).
    pub label_scale: u32,
    /// Offset of the side labels left of `width / 8` (default: 70).
    pub side_label_offset: i32,
    /// Distance of the side labels from the top and bottom edge (default: 150).
    pub side_label_margin: i32,
    /// Draw the ball trail in trackable scenes (default: true).
    pub draw_trace: bool,
    /// Number of ball positions in the trail, current frame included (default: 7).
    pub trace_length: usize,
    pub trail_radius: u32,
    pub trail_color: Color,
    pub ball_color: Color,
    /// Side of the square drawn around the current ball (default: 40).
    pub ball_box_size: u32,
    pub ball_label_scale: u32,
    pub keypoint_radius: u32,
    pub keypoint_color: Color,
    /// Radius of a bounce dot on the court map (default: 30).
    pub bounce_radius: u32,
    pub bounce_color: Color,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            net_line_inset: 300,
            net_line_thickness: 4,
            net_line_color: Color::from_bgr(0, 0, 255),
            label_color: Color::from_bgr(240, 0, 0),
            label_scale: 4,
            side_label_offset: 70,
            side_label_margin: 150,
            draw_trace: true,
            trace_length: 7,
            trail_radius: 5,
            trail_color: Color::from_bgr(240, 0, 0),
            ball_color: Color::from_bgr(0, 255, 0),
            ball_box_size: 40,
            ball_label_scale: 3,
            keypoint_radius: 5,
            keypoint_color: Color::from_bgr(0, 0, 255),
            bounce_radius: 30,
            bounce_color: Color::from_bgr(0, 255, 255),
        }
    }
}

impl OverlayConfig {
    fn label_style(&self) -> TextStyle {
        TextStyle {
            scale: self.label_scale,
            color: self.label_color,
        }
    }
}

pub fn top_side_label(counters: SideCounters) -> String {
    format!(" X's side ground hits: {}", counters.top)
}

pub fn bottom_side_label(counters: SideCounters) -> String {
    format!(" Y's side ground hits: {}", counters.bottom)
}

/// 1-based frame label.
pub fn frame_number_label(frame: usize) -> String {
    format!("Frame number : {}", frame + 1)
}

pub fn combined_label(counters: SideCounters) -> String {
    format!("X side hits: {} | Y side hits: {}", counters.top, counters.bottom)
}

/// Draw the per-frame annotations for one attribution step.
///
/// The net line is drawn only when the frame has a reference line; labels
/// are always drawn and show the counters after this frame.
pub fn annotate_frame(
    frame: &mut FrameBuffer,
    step: &FrameAttribution,
    config: &OverlayConfig,
) -> RenderResult<()> {
    ensure_drawable(frame)?;
    let (width, height) = (frame.width as i32, frame.height as i32);

    if let Some(line_y) = step.reference_line {
        let inset = config.net_line_inset as f32;
        draw_line(
            frame,
            Vec2::new(inset, line_y),
            Vec2::new(width as f32 - inset, line_y),
            config.net_line_thickness,
            config.net_line_color,
        )?;
    }

    let style = config.label_style();
    let label_x = width / 8 - config.side_label_offset;
    draw_text(
        frame,
        &top_side_label(step.counters),
        (label_x, config.side_label_margin),
        style,
    )?;
    draw_text(
        frame,
        &bottom_side_label(step.counters),
        (label_x, height - config.side_label_margin),
        style,
    )?;
    draw_text(
        frame,
        &frame_number_label(step.frame),
        (width - 500, height - 50),
        style,
    )?;

    let combined = combined_label(step.counters);
    let (text_w, _) = text_size(&combined, style.scale);
    draw_text(
        frame,
        &combined,
        (width - text_w as i32 - 20, height - 20),
        style,
    )?;
    Ok(())
}
