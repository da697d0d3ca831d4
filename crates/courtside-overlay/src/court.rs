//! Canonical top-down tennis court.
//!
//! Court-space coordinates are pixels of a 1665x3506 image: a 1117x2408
//! doubles court with a 274 px border left and right and 549 px above and
//! below. Court homographies map frame pixels into this space.

use courtside_core::{FrameBuffer, PixelFormat, Vec2};
use rayon::prelude::*;
use tracing::debug;

/// A straight court line between two points in court space.
pub type CourtLine = ((i32, i32), (i32, i32));

/// Side length of the first dilation applied to the 1 px line drawing.
const LINE_DILATION: usize = 5;
/// Side length of the dilation applied on top for the map image.
const MAP_DILATION: usize = 10;

/// Geometry of the canonical court.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourtReference {
    pub baseline_top: CourtLine,
    pub baseline_bottom: CourtLine,
    pub net: CourtLine,
    pub left_court_line: CourtLine,
    pub right_court_line: CourtLine,
    pub left_inner_line: CourtLine,
    pub right_inner_line: CourtLine,
    pub middle_line: CourtLine,
    pub top_inner_line: CourtLine,
    pub bottom_inner_line: CourtLine,
    pub court_width: u32,
    pub court_height: u32,
    pub top_bottom_border: u32,
    pub right_left_border: u32,
}

pub const COURT_REFERENCE: CourtReference = CourtReference {
    baseline_top: ((286, 561), (1379, 561)),
    baseline_bottom: ((286, 2935), (1379, 2935)),
    net: ((286, 1748), (1379, 1748)),
    left_court_line: ((286, 561), (286, 2935)),
    right_court_line: ((1379, 561), (1379, 2935)),
    left_inner_line: ((423, 561), (423, 2935)),
    right_inner_line: ((1242, 561), (1242, 2935)),
    middle_line: ((832, 1110), (832, 2386)),
    top_inner_line: ((423, 1110), (1242, 1110)),
    bottom_inner_line: ((423, 2386), (1242, 2386)),
    court_width: 1117,
    court_height: 2408,
    top_bottom_border: 549,
    right_left_border: 274,
};

impl CourtReference {
    /// Full image width including borders.
    pub const fn total_width(&self) -> u32 {
        self.court_width + 2 * self.right_left_border
    }

    /// Full image height including borders.
    pub const fn total_height(&self) -> u32 {
        self.court_height + 2 * self.top_bottom_border
    }

    /// Every painted line, net included.
    pub const fn lines(&self) -> [CourtLine; 10] {
        [
            self.baseline_top,
            self.baseline_bottom,
            self.net,
            self.top_inner_line,
            self.bottom_inner_line,
            self.left_court_line,
            self.right_court_line,
            self.right_inner_line,
            self.left_inner_line,
            self.middle_line,
        ]
    }

    /// The 14 court keypoints in detector order.
    ///
    /// Indices 6 and 11 (right inner baseline end, bottom service line end)
    /// are the pair the net reference line is averaged from.
    pub fn keypoints(&self) -> [Vec2; 14] {
        let p = |(x, y): (i32, i32)| Vec2::new(x as f32, y as f32);
        let segments = [
            self.baseline_top,
            self.baseline_bottom,
            self.left_inner_line,
            self.right_inner_line,
            self.top_inner_line,
            self.bottom_inner_line,
            self.middle_line,
        ];
        let mut out = [Vec2::ZERO; 14];
        for (i, (a, b)) in segments.into_iter().enumerate() {
            out[2 * i] = p(a);
            out[2 * i + 1] = p(b);
        }
        out
    }

    /// Binary line mask (0 or 1 per pixel, row-major) with lines thickened
    /// by a 5x5 square.
    pub fn line_mask(&self) -> Vec<u8> {
        let (width, height) = (self.total_width() as usize, self.total_height() as usize);
        let mut mask = vec![0u8; width * height];
        for ((x0, y0), (x1, y1)) in self.lines() {
            for y in y0.min(y1)..=y0.max(y1) {
                for x in x0.min(x1)..=x0.max(x1) {
                    if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
                        mask[y as usize * width + x as usize] = 1;
                    }
                }
            }
        }
        dilate(&mask, width, height, LINE_DILATION)
    }

    /// White-on-black `Rgba8` court drawing used as the bounce map background.
    pub fn court_image(&self) -> FrameBuffer {
        let (width, height) = (self.total_width(), self.total_height());
        let mask = dilate(
            &self.line_mask(),
            width as usize,
            height as usize,
            MAP_DILATION,
        );

        let mut frame = FrameBuffer::new(width, height, PixelFormat::Rgba8);
        let plane = frame.primary_plane_mut();
        let stride = plane.stride;
        plane
            .data
            .par_chunks_exact_mut(stride)
            .zip(mask.par_chunks_exact(width as usize))
            .for_each(|(row, mask_row)| {
                for (px, &m) in row.chunks_exact_mut(4).zip(mask_row) {
                    let v = m * 255;
                    px.copy_from_slice(&[v, v, v, 255]);
                }
            });

        debug!(width, height, "Built canonical court image");
        frame
    }
}

impl Default for CourtReference {
    fn default() -> Self {
        COURT_REFERENCE
    }
}

/// Offsets covered by a square kernel of side `k`, anchored at its center.
///
/// Even sizes reach one pixel further backwards than forwards.
fn kernel_reach(k: usize) -> (isize, isize) {
    let back = (k / 2) as isize;
    (-back, k as isize - 1 - back)
}

/// Binary dilation with a `k` x `k` square, as a row pass then a column pass.
fn dilate(mask: &[u8], width: usize, height: usize, k: usize) -> Vec<u8> {
    if k <= 1 || width == 0 || height == 0 {
        return mask.to_vec();
    }
    let (lo, hi) = kernel_reach(k);

    let mut rows = vec![0u8; mask.len()];
    rows.par_chunks_exact_mut(width)
        .zip(mask.par_chunks_exact(width))
        .for_each(|(out, src)| {
            for (x, o) in out.iter_mut().enumerate() {
                let from = (x as isize + lo).max(0) as usize;
                let to = (x as isize + hi).min(width as isize - 1) as usize;
                *o = src[from..=to].iter().copied().max().unwrap_or(0);
            }
        });

    let mut out = vec![0u8; mask.len()];
    out.par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            let from = (y as isize + lo).max(0) as usize;
            let to = (y as isize + hi).min(height as isize - 1) as usize;
            for src_y in from..=to {
                let src = &rows[src_y * width..(src_y + 1) * width];
                for (o, &s) in out_row.iter_mut().zip(src) {
                    *o |= s;
                }
            }
        });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_size() {
        assert_eq!(COURT_REFERENCE.total_width(), 1665);
        assert_eq!(COURT_REFERENCE.total_height(), 3506);
    }

    #[test]
    fn test_keypoint_order() {
        let kps = COURT_REFERENCE.keypoints();
        assert_eq!(kps[0], Vec2::new(286.0, 561.0));
        assert_eq!(kps[13], Vec2::new(832.0, 2386.0));
        assert_eq!(kps[6], Vec2::new(1242.0, 561.0));
        assert_eq!(kps[11], Vec2::new(1242.0, 2386.0));
    }

    #[test]
    fn test_kernel_reach_matches_anchor() {
        assert_eq!(kernel_reach(5), (-2, 2));
        assert_eq!(kernel_reach(10), (-5, 4));
    }

    #[test]
    fn test_dilate_single_pixel() {
        let (w, h) = (9, 9);
        let mut mask = vec![0u8; w * h];
        mask[4 * w + 4] = 1;
        let out = dilate(&mask, w, h, 3);
        let lit: Vec<(usize, usize)> = (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter(|&(x, y)| out[y * w + x] == 1)
            .collect();
        assert_eq!(lit.len(), 9);
        assert!(lit.iter().all(|&(x, y)| (3..=5).contains(&x) && (3..=5).contains(&y)));
    }

    #[test]
    fn test_dilate_clamps_at_border() {
        let (w, h) = (4, 4);
        let mut mask = vec![0u8; w * h];
        mask[0] = 1;
        let out = dilate(&mask, w, h, 5);
        assert_eq!(out.iter().filter(|&&v| v == 1).count(), 9);
    }

    #[test]
    fn test_court_image_line_band() {
        let image = COURT_REFERENCE.court_image();
        assert_eq!((image.width, image.height), (1665, 3506));

        // Baseline at y = 561: 5x5 then 10x10 covers rows 555..=568.
        let white = Some([255, 255, 255, 255]);
        let black = Some([0, 0, 0, 255]);
        assert_eq!(image.pixel(700, 554), black);
        assert_eq!(image.pixel(700, 555), white);
        assert_eq!(image.pixel(700, 561), white);
        assert_eq!(image.pixel(700, 568), white);
        assert_eq!(image.pixel(700, 569), black);

        // Net is part of the drawing, outside corners are empty.
        assert_eq!(image.pixel(700, 1748), white);
        assert_eq!(image.pixel(10, 10), black);
        assert_eq!(image.pixel(1600, 3400), black);
    }
}
