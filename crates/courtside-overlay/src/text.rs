//! Minimal bitmap text for frame labels.
//!
//! Glyphs are 3x5 cells scaled by an integer factor. The draw origin is the
//! bottom-left corner of the text, so labels anchor the same way whatever
//! the scale.

use crate::draw::{ensure_drawable, fill_rect};
use crate::error::RenderResult;
use courtside_core::{Color, FrameBuffer};
use serde::{Deserialize, Serialize};

const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;
/// Blank columns between glyphs, in cells.
const GLYPH_SPACING: u32 = 1;

/// Label styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Pixels per glyph cell.
    pub scale: u32,
    pub color: Color,
}

const fn glyph_bits(ch: char) -> [u8; 5] {
    match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b111, 0b001, 0b001, 0b101, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b011],
        'R' => [0b111, 0b101, 0b111, 0b110, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b010, 0b000],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '|' => [0b010, 0b010, 0b010, 0b010, 0b010],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b111, 0b101, 0b010, 0b010, 0b111],
    }
}

/// Rendered `(width, height)` of `text` in pixels.
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return (0, 0);
    }
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) * scale;
    (chars * advance - GLYPH_SPACING * scale, GLYPH_HEIGHT * scale)
}

fn draw_char(frame: &mut FrameBuffer, x: i32, y: i32, ch: char, style: TextStyle) {
    let glyph = glyph_bits(ch.to_ascii_uppercase());
    let s = style.scale as i32;
    for (row, pattern) in glyph.iter().enumerate() {
        for col in 0..GLYPH_WIDTH as i32 {
            if (pattern >> (GLYPH_WIDTH as i32 - 1 - col)) & 1 == 1 {
                fill_rect(
                    frame,
                    x.saturating_add(col * s),
                    y.saturating_add(row as i32 * s),
                    style.scale,
                    style.scale,
                    style.color,
                );
            }
        }
    }
}

/// Draw `text` with its bottom-left corner at `origin`.
pub fn draw_text(
    frame: &mut FrameBuffer,
    text: &str,
    origin: (i32, i32),
    style: TextStyle,
) -> RenderResult<()> {
    ensure_drawable(frame)?;
    let scale = style.scale.max(1);
    let style = TextStyle { scale, ..style };
    let top = origin.1.saturating_sub((GLYPH_HEIGHT * scale) as i32);
    let advance = ((GLYPH_WIDTH + GLYPH_SPACING) * scale) as i32;

    let mut x = origin.0;
    for ch in text.chars() {
        if ch != ' ' {
            draw_char(frame, x, top, ch, style);
        }
        x = x.saturating_add(advance);
    }
    Ok(())
}
