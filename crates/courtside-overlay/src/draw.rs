//! Raster drawing primitives on `Rgba8` frames.
//!
//! Shapes are clipped to the frame; pixels outside are silently dropped.
//! Coordinates are truncated toward zero when snapped to the pixel grid.

use crate::error::{RenderError, RenderResult};
use courtside_core::{Color, FrameBuffer, PixelFormat, Rect, Vec2};

/// How a closed shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    /// Outline of the given width in pixels.
    Outline(u32),
    /// Solid interior.
    Filled,
}

/// Fail unless the frame can receive overlays.
pub fn ensure_drawable(frame: &FrameBuffer) -> RenderResult<()> {
    if frame.format != PixelFormat::Rgba8 {
        return Err(RenderError::UnsupportedFormat(frame.format));
    }
    if frame.width == 0 || frame.height == 0 {
        return Err(RenderError::EmptyFrame {
            width: frame.width,
            height: frame.height,
        });
    }
    Ok(())
}

/// Largest pixel offset from the origin a shape may be anchored at.
pub const MAX_PIXEL_COORD: f32 = 1.0e6;

/// Snap a point to the pixel grid.
#[inline]
pub fn to_pixel(what: &'static str, p: Vec2) -> RenderResult<(i32, i32)> {
    if !p.is_finite() {
        return Err(RenderError::NonFiniteCoordinate { what, x: p.x, y: p.y });
    }
    if p.x.abs() > MAX_PIXEL_COORD || p.y.abs() > MAX_PIXEL_COORD {
        return Err(RenderError::CoordinateOutOfRange { what, x: p.x, y: p.y });
    }
    Ok((p.x as i32, p.y as i32))
}

/// Paint a `size` x `size` square centered on `(x, y)`.
#[inline]
fn stamp(frame: &mut FrameBuffer, x: i32, y: i32, size: u32, rgba: [u8; 4]) {
    let size = size.clamp(1, i32::MAX as u32) as i32;
    let (left, top) = (x.saturating_sub(size / 2), y.saturating_sub(size / 2));
    for dy in 0..size {
        for dx in 0..size {
            frame.put_pixel(left.saturating_add(dx), top.saturating_add(dy), rgba);
        }
    }
}

/// Straight line with a square brush (Bresenham).
pub fn draw_line(
    frame: &mut FrameBuffer,
    from: Vec2,
    to: Vec2,
    thickness: u32,
    color: Color,
) -> RenderResult<()> {
    ensure_drawable(frame)?;
    let (x0, y0) = to_pixel("line start", from)?;
    let (x1, y1) = to_pixel("line end", to)?;
    let rgba = color.to_rgba8();

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        stamp(frame, x, y, thickness, rgba);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    Ok(())
}

/// Circle outline or disc around `center`.
pub fn draw_circle(
    frame: &mut FrameBuffer,
    center: Vec2,
    radius: u32,
    stroke: Stroke,
    color: Color,
) -> RenderResult<()> {
    ensure_drawable(frame)?;
    let (cx, cy) = to_pixel("circle center", center)?;
    let rgba = color.to_rgba8();
    let r = radius as f32;

    let (inner, outer) = match stroke {
        Stroke::Filled => (f32::NEG_INFINITY, r + 0.5),
        Stroke::Outline(width) => {
            let half = width.max(1) as f32 / 2.0;
            (r - half, r + half)
        }
    };

    let reach = outer.ceil() as i32;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let d = ((dx as i64 * dx as i64 + dy as i64 * dy as i64) as f64).sqrt() as f32;
            if d >= inner && d < outer {
                frame.put_pixel(cx.saturating_add(dx), cy.saturating_add(dy), rgba);
            }
        }
    }
    Ok(())
}

/// Rectangle outline; the stroke is centered on the rectangle edges.
pub fn draw_rect(
    frame: &mut FrameBuffer,
    rect: Rect,
    thickness: u32,
    color: Color,
) -> RenderResult<()> {
    let (min, max) = (rect.min(), rect.max());
    let corners = [
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
    ];
    for i in 0..4 {
        draw_line(frame, corners[i], corners[(i + 1) % 4], thickness, color)?;
    }
    Ok(())
}

/// Solid axis-aligned block, used for glyph cells.
pub fn fill_rect(frame: &mut FrameBuffer, x: i32, y: i32, width: u32, height: u32, color: Color) {
    let rgba = color.to_rgba8();
    let bottom = y.saturating_add(height.min(i32::MAX as u32) as i32);
    let right = x.saturating_add(width.min(i32::MAX as u32) as i32);
    for yy in y..bottom {
        for xx in x..right {
            frame.put_pixel(xx, yy, rgba);
        }
    }
}
