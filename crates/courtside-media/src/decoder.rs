//! Video decoder using FFmpeg via ffmpeg-sidecar.

use crate::ffmpeg_binary;
use courtside_core::frame_budget::{ANALYSIS_HEIGHT, ANALYSIS_WIDTH};
use courtside_core::{CourtsideError, FrameBuffer, FrameRate, Result};
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use ffmpeg_sidecar::iter::FfmpegIterator;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Decode settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Output width; every frame is scaled to it (default: 1280).
    pub width: u32,
    /// Output height (default: 720).
    pub height: u32,
    /// Stop after this many frames.
    pub max_frames: Option<usize>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            width: ANALYSIS_WIDTH,
            height: ANALYSIS_HEIGHT,
            max_frames: None,
        }
    }
}

impl DecodeConfig {
    /// FFmpeg arguments placed between input and output.
    pub fn filter_args(&self) -> Vec<String> {
        let mut args = vec!["-vf".to_string(), format!("scale={}:{}", self.width, self.height)];
        if let Some(n) = self.max_frames {
            args.extend(["-frames:v".to_string(), n.to_string()]);
        }
        args
    }
}

/// A decoded video frame with metadata.
pub struct VideoFrame {
    /// Frame data in RGBA8 format
    pub buffer: FrameBuffer,
    /// Presentation timestamp in seconds
    pub pts: f64,
    /// Frame number
    pub frame_number: u64,
}

/// A fully decoded clip.
pub struct DecodedClip {
    pub frames: Vec<FrameBuffer>,
    /// Source frame rate, when FFmpeg reported one.
    pub frame_rate: Option<FrameRate>,
}

/// Streaming video decoder.
///
/// Spawns FFmpeg as a subprocess writing raw RGB24 to stdout; frames are
/// converted to `Rgba8` as they arrive.
pub struct VideoDecoder {
    path: PathBuf,
    config: DecodeConfig,
    child: FfmpegChild,
    events: FfmpegIterator,
    frame_rate: Option<FrameRate>,
    current_frame: u64,
    finished: bool,
}

impl VideoDecoder {
    /// Open a video file for decoding.
    pub fn open<P: AsRef<Path>>(path: P, config: &DecodeConfig) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CourtsideError::NotFound(format!(
                "Video file not found: {}",
                path.display()
            )));
        }

        info!(path = %path.display(), width = config.width, height = config.height, "Opening video");

        let mut child = FfmpegCommand::new_with_path(ffmpeg_binary())
            .input(path.to_string_lossy().as_ref())
            .args(config.filter_args())
            .rawvideo()
            .spawn()
            .map_err(|e| CourtsideError::Decoder(format!("Failed to spawn ffmpeg: {e}")))?;
        let events = child
            .iter()
            .map_err(|e| CourtsideError::Decoder(format!("Failed to read ffmpeg output: {e}")))?;

        Ok(Self {
            path: path.to_path_buf(),
            config: config.clone(),
            child,
            events,
            frame_rate: None,
            current_frame: 0,
            finished: false,
        })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Output frame dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Source frame rate, known once the input stream has been parsed.
    pub fn frame_rate(&self) -> Option<FrameRate> {
        self.frame_rate
    }

    /// Number of frames decoded so far.
    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }

    /// Decode the next frame, `None` at end of stream.
    pub fn decode_frame(&mut self) -> Result<Option<VideoFrame>> {
        if self.finished {
            return Ok(None);
        }

        for event in self.events.by_ref() {
            match event {
                FfmpegEvent::ParsedInputStream(stream) => {
                    if let Some(video) = stream.video_data() {
                        if self.frame_rate.is_none() {
                            self.frame_rate = FrameRate::from_fps_f64(video.fps as f64);
                            debug!(
                                fps = video.fps,
                                width = video.width,
                                height = video.height,
                                "Parsed input video stream"
                            );
                        }
                    }
                }
                FfmpegEvent::OutputFrame(frame) => {
                    let buffer = FrameBuffer::from_rgb24(frame.width, frame.height, &frame.data)
                        .map_err(|e| CourtsideError::Decoder(e.to_string()))?;
                    let frame_number = self.current_frame;
                    self.current_frame += 1;
                    return Ok(Some(VideoFrame {
                        buffer,
                        pts: frame.timestamp as f64,
                        frame_number,
                    }));
                }
                FfmpegEvent::Log(LogLevel::Fatal, msg) => {
                    self.finished = true;
                    return Err(CourtsideError::Decoder(msg));
                }
                FfmpegEvent::Log(LogLevel::Error, msg) | FfmpegEvent::Error(msg) => {
                    warn!(path = %self.path.display(), "ffmpeg: {}", msg);
                }
                FfmpegEvent::Done => break,
                _ => {}
            }
        }

        self.finished = true;
        let _ = self.child.wait();
        info!(frames = self.current_frame, "Video decode complete");
        Ok(None)
    }

    /// Decode every remaining frame.
    pub fn read_all(mut self) -> Result<DecodedClip> {
        let mut frames = Vec::new();
        while let Some(frame) = self.decode_frame()? {
            frames.push(frame.buffer);
        }
        if frames.is_empty() {
            return Err(CourtsideError::Decoder(format!(
                "No frames decoded from {}",
                self.path.display()
            )));
        }
        Ok(DecodedClip {
            frames,
            frame_rate: self.frame_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scales_to_analysis_size() {
        let args = DecodeConfig::default().filter_args();
        assert_eq!(args, vec!["-vf".to_string(), "scale=1280:720".to_string()]);
    }

    #[test]
    fn test_max_frames_limits_output() {
        let config = DecodeConfig {
            max_frames: Some(90),
            ..Default::default()
        };
        let args = config.filter_args();
        assert_eq!(&args[2..], &["-frames:v".to_string(), "90".to_string()]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = VideoDecoder::open("/nonexistent/match.mp4", &DecodeConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, CourtsideError::NotFound(_)));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: DecodeConfig = serde_json::from_str(r#"{"max_frames": 10}"#).unwrap();
        assert_eq!(config.width, 1280);
        assert_eq!(config.max_frames, Some(10));
    }
}
