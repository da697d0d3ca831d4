//! Geometric primitives: points, rectangles and planar homographies.

use glam::{Mat3, Vec2 as GlamVec2, Vec3};
use serde::{Deserialize, Serialize};

/// 2D vector.
pub type Vec2 = GlamVec2;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from center and size.
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            x: center.x - size.x * 0.5,
            y: center.y - size.y * 0.5,
            width: size.x,
            height: size.y,
        }
    }

    /// Minimum corner (top-left).
    #[inline]
    pub fn min(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Maximum corner (bottom-right).
    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }
}

/// Row-major 3x3 matrix as it appears in detection files.
pub type Mat3Rows = [[f32; 3]; 3];

/// A planar projective transform (pixel space to canonical court space).
///
/// Serialized as row-major nested arrays; stored column-major in a glam `Mat3`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Mat3Rows", into = "Mat3Rows")]
pub struct Homography(Mat3);

impl Homography {
    /// Identity transform.
    pub const IDENTITY: Self = Self(Mat3::IDENTITY);

    /// Homogeneous weights smaller than this put the point at infinity.
    const MIN_W: f32 = 1e-8;

    /// Build from row-major coefficients `m[row][col]`.
    pub fn from_rows(m: Mat3Rows) -> Self {
        Self(Mat3::from_cols(
            Vec3::new(m[0][0], m[1][0], m[2][0]),
            Vec3::new(m[0][1], m[1][1], m[2][1]),
            Vec3::new(m[0][2], m[1][2], m[2][2]),
        ))
    }

    /// Row-major coefficients.
    pub fn to_rows(self) -> Mat3Rows {
        self.0.transpose().to_cols_array_2d()
    }

    /// Apply the transform with homogeneous division.
    ///
    /// Returns `None` when the point maps to the line at infinity.
    #[inline]
    pub fn project(&self, point: Vec2) -> Option<Vec2> {
        let p = self.0 * point.extend(1.0);
        if p.z.abs() < Self::MIN_W || !p.is_finite() {
            return None;
        }
        Some(Vec2::new(p.x / p.z, p.y / p.z))
    }

    /// Solve the transform mapping four source points onto four destination points (DLT).
    pub fn from_correspondences(src: &[Vec2; 4], dst: &[Vec2; 4]) -> Option<Self> {
        let mut m = [[0.0f64; 9]; 8];
        for i in 0..4 {
            let (x, y) = (src[i].x as f64, src[i].y as f64);
            let (xp, yp) = (dst[i].x as f64, dst[i].y as f64);
            m[i * 2] = [-x, -y, -1.0, 0.0, 0.0, 0.0, x * xp, y * xp, xp];
            m[i * 2 + 1] = [0.0, 0.0, 0.0, -x, -y, -1.0, x * yp, y * yp, yp];
        }

        // Gauss-Jordan elimination with partial pivoting
        #[allow(clippy::needless_range_loop)]
        for col in 0..8 {
            let mut max_row = col;
            let mut max_val = m[col][col].abs();
            for row in (col + 1)..8 {
                if m[row][col].abs() > max_val {
                    max_val = m[row][col].abs();
                    max_row = row;
                }
            }
            if max_val < 1e-10 {
                return None;
            }
            m.swap(col, max_row);
            let pivot = m[col][col];
            for j in col..9 {
                m[col][j] /= pivot;
            }
            for row in 0..8 {
                if row != col {
                    let factor = m[row][col];
                    for j in col..9 {
                        m[row][j] -= factor * m[col][j];
                    }
                }
            }
        }

        let mut h = [0.0f32; 9];
        h[8] = 1.0;
        for i in 0..8 {
            h[i] = -m[i][8] as f32;
        }
        Some(Self::from_rows([
            [h[0], h[1], h[2]],
            [h[3], h[4], h[5]],
            [h[6], h[7], h[8]],
        ]))
    }
}

impl Default for Homography {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Mat3Rows> for Homography {
    fn from(rows: Mat3Rows) -> Self {
        Self::from_rows(rows)
    }
}

impl From<Homography> for Mat3Rows {
    fn from(h: Homography) -> Self {
        h.to_rows()
    }
}
