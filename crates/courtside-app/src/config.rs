//! Run configuration: a JSON file with every section optional.
//!
//! ```json
//! {
//!   "pipeline": { "overlay": { "trace_length": 10 }, "parallel_scenes": false },
//!   "scene_detect": { "cut_threshold": 0.25 },
//!   "decode": { "max_frames": 900 },
//!   "encode": { "codec": "mpeg4", "quality": 4 }
//! }
//! ```

use anyhow::{Context, Result};
use courtside_analysis::SceneDetectConfig;
use courtside_media::{DecodeConfig, EncodeConfig};
use courtside_overlay::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub scene_detect: SceneDetectConfig,
    pub decode: DecodeConfig,
    pub encode: EncodeConfig,
}

impl AppConfig {
    /// Load from `path`, or defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_slice(&data)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}
