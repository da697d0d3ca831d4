//! Media file probing with `ffprobe`, without a full decode.

use courtside_core::{CourtsideError, FrameRate, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Information about a media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaProbe {
    /// File path
    pub path: String,
    /// Duration in seconds
    pub duration_secs: Option<f64>,
    /// Video streams
    pub video_streams: Vec<VideoStreamInfo>,
    /// Container format
    pub format: String,
}

/// Information about a video stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub index: usize,
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: Option<FrameRate>,
    pub pixel_format: String,
    /// Frame count from the container, when it records one.
    pub frame_count: Option<u64>,
}

// ffprobe -print_format json output, only the fields read here.
#[derive(Deserialize)]
struct RawProbe {
    #[serde(default)]
    streams: Vec<RawStream>,
    format: Option<RawFormat>,
}

#[derive(Deserialize)]
struct RawStream {
    index: usize,
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    pix_fmt: Option<String>,
    r_frame_rate: Option<String>,
    nb_frames: Option<String>,
}

#[derive(Deserialize)]
struct RawFormat {
    format_name: Option<String>,
    duration: Option<String>,
}

impl MediaProbe {
    /// Probe a media file.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();

        if !path.exists() {
            return Err(CourtsideError::NotFound(format!(
                "File not found: {}",
                path_str
            )));
        }

        let ffprobe = which::which("ffprobe")
            .map_err(|e| CourtsideError::NotFound(format!("ffprobe not available: {e}")))?;
        let output = Command::new(ffprobe)
            .args(["-v", "error", "-print_format", "json", "-show_streams", "-show_format"])
            .arg(path)
            .output()?;

        if !output.status.success() {
            return Err(CourtsideError::Decoder(format!(
                "ffprobe failed on {}: {}",
                path_str,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let probe = Self::from_ffprobe_json(&path_str, &output.stdout)?;
        debug!(path = %path_str, streams = probe.video_streams.len(), "Probed media");
        Ok(probe)
    }

    /// Parse `ffprobe -print_format json` output.
    pub fn from_ffprobe_json(path: &str, json: &[u8]) -> Result<Self> {
        let raw: RawProbe = serde_json::from_slice(json)
            .map_err(|e| CourtsideError::Serialization(format!("Invalid ffprobe output: {e}")))?;

        let video_streams = raw
            .streams
            .into_iter()
            .filter(|s| s.codec_type.as_deref() == Some("video"))
            .map(|s| VideoStreamInfo {
                index: s.index,
                codec: s.codec_name.unwrap_or_default(),
                width: s.width.unwrap_or(0),
                height: s.height.unwrap_or(0),
                frame_rate: s.r_frame_rate.as_deref().and_then(parse_rate),
                pixel_format: s.pix_fmt.unwrap_or_default(),
                frame_count: s.nb_frames.and_then(|n| n.parse().ok()),
            })
            .collect();

        let (format, duration_secs) = match raw.format {
            Some(f) => (
                f.format_name.unwrap_or_default(),
                f.duration.and_then(|d| d.parse().ok()),
            ),
            None => (String::new(), None),
        };

        Ok(Self {
            path: path.to_string(),
            duration_secs,
            video_streams,
            format,
        })
    }

    /// Check if the file has video.
    pub fn has_video(&self) -> bool {
        !self.video_streams.is_empty()
    }

    /// Get the primary video stream info.
    pub fn primary_video(&self) -> Option<&VideoStreamInfo> {
        self.video_streams.first()
    }
}

/// Parse an ffprobe rate such as `30000/1001`; `0/0` means unknown.
fn parse_rate(s: &str) -> Option<FrameRate> {
    let (num, den) = s.split_once('/')?;
    let (num, den): (u32, u32) = (num.trim().parse().ok()?, den.trim().parse().ok()?);
    (num > 0 && den > 0).then(|| FrameRate::new(num, den))
}
