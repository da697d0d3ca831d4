//! Frame buffer types for video frames in CPU memory.
//!
//! Every frame of a run shares one resolution. Overlays are drawn in place on
//! the `Rgba8` primary plane before the frame is handed to the encoder.

use crate::error::{CourtsideError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Pixel format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGBA (32 bits per pixel)
    #[default]
    Rgba8,
    /// 8-bit grayscale
    Gray8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 => 4,
            Self::Gray8 => 1,
        }
    }

    /// Calculate total bytes needed for a tightly packed frame of this format.
    pub fn frame_size(self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.bytes_per_pixel()
    }
}

/// A plane of pixel data with stride information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePlane {
    /// Raw pixel data
    pub data: Vec<u8>,
    /// Bytes per row (may include padding)
    pub stride: usize,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bytes per pixel
    pub bytes_per_pixel: usize,
}

impl FramePlane {
    /// Create a new zeroed frame plane with the given dimensions.
    pub fn new(width: u32, height: u32, bytes_per_pixel: usize) -> Self {
        // Align stride to 64 bytes for SIMD friendliness
        let min_stride = (width as usize) * bytes_per_pixel;
        let stride = (min_stride + 63) & !63;
        let data = vec![0u8; stride * height as usize];
        Self {
            data,
            stride,
            width,
            height,
            bytes_per_pixel,
        }
    }

    /// Get a row of pixel data.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * self.bytes_per_pixel;
        &self.data[start..end]
    }

    /// Get a mutable row of pixel data.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * self.bytes_per_pixel;
        &mut self.data[start..end]
    }
}

/// A video frame in CPU memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixel format
    pub format: PixelFormat,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel data planes
    pub planes: SmallVec<[FramePlane; 1]>,
}

impl FrameBuffer {
    /// Create a new zeroed frame buffer with the given dimensions and format.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            format,
            width,
            height,
            planes: smallvec::smallvec![FramePlane::new(width, height, format.bytes_per_pixel())],
        }
    }

    /// Create an `Rgba8` frame filled with a single color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut frame = Self::new(width, height, PixelFormat::Rgba8);
        let plane = frame.primary_plane_mut();
        for y in 0..height {
            for px in plane.row_mut(y).chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
        frame
    }

    /// Build an `Rgba8` frame from tightly packed RGB24 bytes (decoder output).
    pub fn from_rgb24(width: u32, height: u32, rgb: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(CourtsideError::InvalidParameter(format!(
                "RGB24 buffer holds {} bytes, {}x{} needs {}",
                rgb.len(),
                width,
                height,
                expected
            )));
        }

        let mut frame = Self::new(width, height, PixelFormat::Rgba8);
        let row_bytes = width as usize * 3;
        let plane = frame.primary_plane_mut();
        for y in 0..height {
            let src = &rgb[y as usize * row_bytes..(y as usize + 1) * row_bytes];
            for (dst, px) in plane.row_mut(y).chunks_exact_mut(4).zip(src.chunks_exact(3)) {
                dst[..3].copy_from_slice(px);
                dst[3] = 255;
            }
        }
        Ok(frame)
    }

    /// Pack the primary plane into contiguous bytes without stride padding.
    pub fn to_packed_bytes(&self) -> Vec<u8> {
        let plane = self.primary_plane();
        let mut out = Vec::with_capacity(self.format.frame_size(self.width, self.height));
        for y in 0..self.height {
            out.extend_from_slice(plane.row(y));
        }
        out
    }

    /// Get the primary plane (plane 0).
    #[inline]
    pub fn primary_plane(&self) -> &FramePlane {
        &self.planes[0]
    }

    /// Get the primary plane mutably.
    #[inline]
    pub fn primary_plane_mut(&mut self) -> &mut FramePlane {
        &mut self.planes[0]
    }

    /// Read an `Rgba8` pixel, `None` outside the frame or for other formats.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if !self.in_bounds(x, y) || self.format != PixelFormat::Rgba8 {
            return None;
        }
        let row = self.primary_plane().row(y as u32);
        let i = x as usize * 4;
        Some([row[i], row[i + 1], row[i + 2], row[i + 3]])
    }

    /// Write an `Rgba8` pixel; writes outside the frame are clipped.
    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        if !self.in_bounds(x, y) || self.format != PixelFormat::Rgba8 {
            return;
        }
        let row = self.primary_plane_mut().row_mut(y as u32);
        let i = x as usize * 4;
        row[i..i + 4].copy_from_slice(&rgba);
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }
}
