//! End-of-run summary, printed and optionally written as JSON.

use anyhow::{Context, Result};
use courtside_analysis::{
    AttributionSummary, Scene, SceneReport, Side, SideCounters, SkippedBounce,
};
use courtside_overlay::{BounceMark, PipelineOutput};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneMarks {
    pub scene: Scene,
    pub marks: Vec<BounceMark>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub frame_count: usize,
    /// Frames written, both passes. Zero when nothing was rendered.
    pub output_frames: usize,
    pub counters: SideCounters,
    pub top_bounces: Vec<usize>,
    pub bottom_bounces: Vec<usize>,
    pub skipped_bounces: Vec<SkippedBounce>,
    pub scenes: Vec<SceneReport>,
    pub court_marks: Vec<SceneMarks>,
}

impl RunSummary {
    pub fn from_attribution(
        frame_count: usize,
        attribution: &AttributionSummary,
        scenes: Vec<SceneReport>,
    ) -> Self {
        Self {
            frame_count,
            output_frames: 0,
            counters: attribution.counters,
            top_bounces: attribution.frames_on(Side::Top),
            bottom_bounces: attribution.frames_on(Side::Bottom),
            skipped_bounces: attribution.skipped.clone(),
            scenes,
            court_marks: Vec::new(),
        }
    }

    pub fn from_output(output: &PipelineOutput) -> Self {
        let mut summary = Self::from_attribution(
            output.annotated_len,
            &output.attribution,
            output.scene_reports.clone(),
        );
        summary.output_frames = output.frames.len();
        summary.court_marks = output
            .court_maps
            .iter()
            .map(|m| SceneMarks {
                scene: m.scene,
                marks: m.marks.clone(),
            })
            .collect();
        summary
    }

    /// Human-readable report for the terminal.
    pub fn render_text(&self) -> String {
        let trackable = self.scenes.iter().filter(|s| s.is_trackable()).count();
        let mut out = String::new();
        let _ = writeln!(out, "Frames:              {}", self.frame_count);
        if self.output_frames > 0 {
            let _ = writeln!(out, "Output frames:       {}", self.output_frames);
        }
        let _ = writeln!(
            out,
            "Scenes:              {} ({} trackable)",
            self.scenes.len(),
            trackable
        );
        let _ = writeln!(out, "X side ground hits:  {}", self.counters.top);
        let _ = writeln!(out, "Y side ground hits:  {}", self.counters.bottom);
        if !self.skipped_bounces.is_empty() {
            let _ = writeln!(out, "Unattributed bounces: {}", self.skipped_bounces.len());
        }
        out
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).context("Failed to serialize summary")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write summary {}", path.display()))
    }
}
