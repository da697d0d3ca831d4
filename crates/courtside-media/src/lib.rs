//! Courtside Media - FFmpeg integration for clip I/O
//!
//! This crate handles:
//! - Decoding a clip into `Rgba8` analysis frames
//! - Media file probing
//! - Encoding annotated frames back to a video file

pub mod decoder;
pub mod export;
pub mod probe;

pub use decoder::{DecodeConfig, DecodedClip, VideoDecoder, VideoFrame};
pub use export::{EncodeConfig, ExportJob, ExportProgress, VideoCodec};
pub use probe::MediaProbe;

use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Path of the `ffmpeg` binary: `PATH` first, then the sidecar download location.
pub fn ffmpeg_binary() -> PathBuf {
    which::which("ffmpeg").unwrap_or_else(|_| ffmpeg_sidecar::paths::ffmpeg_path())
}

/// Whether [`ffmpeg_binary`] can be run.
pub fn ffmpeg_available() -> bool {
    Command::new(ffmpeg_binary())
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
