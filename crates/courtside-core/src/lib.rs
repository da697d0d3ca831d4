//! Courtside Core - Foundation types for match annotation
//!
//! This crate provides the fundamental types used throughout Courtside:
//! - Frame buffers and pixel formats
//! - Overlay colors
//! - Geometric primitives and court homographies
//! - Frame rates

pub mod color;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod time;

pub use color::Color;
pub use error::{CourtsideError, Result};
pub use frame::{FrameBuffer, FramePlane, PixelFormat};
pub use geometry::{Homography, Rect, Vec2};
pub use time::FrameRate;

/// Frame geometry the detection models are trained on.
pub mod frame_budget {
    /// Width every decoded frame is resized to.
    pub const ANALYSIS_WIDTH: u32 = 1280;

    /// Height every decoded frame is resized to.
    pub const ANALYSIS_HEIGHT: u32 = 720;
}
