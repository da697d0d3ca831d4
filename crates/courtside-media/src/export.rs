//! Encoding annotated frames to a video file.
//!
//! Frames are piped as raw RGBA into an FFmpeg subprocess.

use crate::ffmpeg_binary;
use courtside_core::{CourtsideError, FrameBuffer, FrameRate, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::{debug, info};

/// Video codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    H264,
    /// MPEG-4 Part 2, the `mp4v` fourcc.
    Mpeg4,
}

impl VideoCodec {
    /// FFmpeg encoder name.
    pub fn ffmpeg_encoder(self) -> &'static str {
        match self {
            Self::H264 => "libx264",
            Self::Mpeg4 => "mpeg4",
        }
    }

    /// Quality flag for this encoder: CRF for x264, quantizer for mpeg4.
    fn quality_flag(self) -> &'static str {
        match self {
            Self::H264 => "-crf",
            Self::Mpeg4 => "-q:v",
        }
    }
}

/// Encode settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    pub codec: VideoCodec,
    /// CRF for H.264 (0-51), quantizer for MPEG-4 (1-31); lower is better.
    pub quality: Option<u32>,
    pub pixel_format: String,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            codec: VideoCodec::H264,
            quality: Some(18),
            pixel_format: "yuv420p".to_string(),
        }
    }
}

/// Export progress information.
#[derive(Debug, Clone)]
pub struct ExportProgress {
    /// Frames written so far.
    pub current_frame: u64,
    /// Total frames to write.
    pub total_frames: u64,
    /// Estimated time remaining in seconds.
    pub eta_seconds: f64,
    /// Frames per second (encoding speed).
    pub fps: f64,
}

impl ExportProgress {
    /// Completion percentage (0.0 to 1.0).
    pub fn fraction(&self) -> f64 {
        if self.total_frames == 0 {
            return 0.0;
        }
        self.current_frame as f64 / self.total_frames as f64
    }
}

/// An encode of one frame sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportJob {
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
    pub config: EncodeConfig,
}

impl ExportJob {
    /// Create a job for `frames`, which must all share one size.
    pub fn for_frames(
        output_path: impl Into<PathBuf>,
        frames: &[FrameBuffer],
        frame_rate: FrameRate,
        config: EncodeConfig,
    ) -> Result<Self> {
        let first = frames
            .first()
            .ok_or_else(|| CourtsideError::InvalidParameter("No frames to encode".into()))?;
        let (width, height) = (first.width, first.height);

        if let Some((i, f)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.width != width || f.height != height)
        {
            return Err(CourtsideError::InvalidParameter(format!(
                "Frame {} is {}x{}, expected {}x{}",
                i, f.width, f.height, width, height
            )));
        }
        if width % 2 != 0 || height % 2 != 0 {
            return Err(CourtsideError::InvalidParameter(format!(
                "Frame size {width}x{height} must be even for {}",
                config.pixel_format
            )));
        }

        Ok(Self {
            output_path: output_path.into(),
            width,
            height,
            frame_rate,
            config,
        })
    }

    /// Build the FFmpeg command arguments.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        // Input from pipe (raw frames)
        args.extend_from_slice(&[
            "-y".into(),
            "-f".into(),
            "rawvideo".into(),
            "-pixel_format".into(),
            "rgba".into(),
            "-video_size".into(),
            format!("{}x{}", self.width, self.height),
            "-framerate".into(),
            format!(
                "{}/{}",
                self.frame_rate.numerator, self.frame_rate.denominator
            ),
            "-i".into(),
            "pipe:0".into(),
        ]);

        args.extend_from_slice(&["-c:v".into(), self.config.codec.ffmpeg_encoder().into()]);

        if let Some(quality) = self.config.quality {
            args.extend_from_slice(&[
                self.config.codec.quality_flag().into(),
                quality.to_string(),
            ]);
        }

        args.extend_from_slice(&["-pix_fmt".into(), self.config.pixel_format.clone()]);

        args.push(self.output_path.to_string_lossy().into_owned());
        args
    }

    /// Pipe `frames` into FFmpeg, calling `on_progress` every 30 frames.
    pub fn run(&self, frames: &[FrameBuffer], on_progress: impl Fn(ExportProgress)) -> Result<()> {
        let total_frames = frames.len() as u64;
        if total_frames == 0 {
            return Ok(());
        }

        let args = self.ffmpeg_args();
        let binary = ffmpeg_binary();
        debug!(binary = %binary.display(), ?args, "Spawning encoder");

        let mut child = Command::new(&binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CourtsideError::Encoder(format!("Failed to spawn ffmpeg: {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CourtsideError::Encoder("Failed to open ffmpeg stdin".into()))?;

        let start_time = Instant::now();

        for (frame_number, frame) in (0u64..).zip(frames) {
            stdin
                .write_all(&frame.to_packed_bytes())
                .map_err(|e| CourtsideError::Encoder(format!("Failed to write frame: {e}")))?;

            if frame_number % 30 == 0 || frame_number == total_frames - 1 {
                let elapsed = start_time.elapsed().as_secs_f64();
                let fps = if elapsed > 0.0 {
                    (frame_number + 1) as f64 / elapsed
                } else {
                    0.0
                };
                let remaining = if fps > 0.0 {
                    (total_frames - frame_number - 1) as f64 / fps
                } else {
                    0.0
                };
                on_progress(ExportProgress {
                    current_frame: frame_number + 1,
                    total_frames,
                    eta_seconds: remaining,
                    fps,
                });
            }
        }

        // Close stdin to signal end-of-stream
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| CourtsideError::Encoder(format!("Failed to wait for ffmpeg: {e}")))?;

        if !status.success() {
            return Err(CourtsideError::Encoder(format!(
                "ffmpeg exited with status: {}",
                status
            )));
        }

        info!(
            path = %self.output_path.display(),
            frames = total_frames,
            "Export complete"
        );
        Ok(())
    }
}
