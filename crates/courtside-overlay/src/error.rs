//! Errors raised while drawing into a frame.

use courtside_core::PixelFormat;
use thiserror::Error;

/// A drawing step could not be completed for one frame.
///
/// Never fatal: the pipeline logs it and emits the frame as drawn so far.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// Overlays are only drawn into `Rgba8` frames.
    #[error("Cannot draw into {0:?} frame")]
    UnsupportedFormat(PixelFormat),

    /// The frame has no pixels.
    #[error("Frame is empty ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },

    /// A coordinate handed to the compositor was NaN or infinite.
    #[error("Non-finite {what} coordinate: ({x}, {y})")]
    NonFiniteCoordinate { what: &'static str, x: f32, y: f32 },

    /// A coordinate too far off the pixel grid to rasterize.
    #[error("{what} coordinate out of range: ({x}, {y})")]
    CoordinateOutOfRange { what: &'static str, x: f32, y: f32 },
}

/// Result type alias for drawing operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
