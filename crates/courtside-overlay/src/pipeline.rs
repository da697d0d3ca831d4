//! Two-pass annotation pipeline.
//!
//! 1. Forward pass over every frame: net line, side-hit attribution and
//!    counter labels. Strictly sequential; the counters have one writer.
//! 2. Scene pass: classify each scene and redraw trackable ones with the
//!    ball trail, keypoints and a court map. Scenes are independent and run
//!    in parallel, reassembled in scene order.
//!
//! The output is the pass-1 frames followed by the pass-2 frames.

use crate::court::COURT_REFERENCE;
use crate::overlay::{annotate_frame, OverlayConfig};
use crate::scene_view::{render_scene, BounceMark, SceneRender};
use courtside_analysis::{
    classify_scenes, AttributionSummary, HitAttributor, MatchDetections, Scene, SceneReport,
    SideCounters, TrackabilityConfig,
};
use courtside_core::FrameBuffer;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub overlay: OverlayConfig,
    pub trackability: TrackabilityConfig,
    /// Render scenes on the rayon pool (default: true).
    pub parallel_scenes: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            overlay: OverlayConfig::default(),
            trackability: TrackabilityConfig::default(),
            parallel_scenes: true,
        }
    }
}

/// Pipeline stages, reported through the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    /// Pass 1: per-frame annotation.
    Annotating,
    /// Pass 2: scene visualization.
    Visualizing,
    Complete,
}

/// Progress of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineProgress {
    pub stage: PipelineStage,
    /// Items of the current stage done (frames in pass 1, scenes in pass 2).
    pub done: usize,
    pub total: usize,
}

/// Court map of one trackable scene.
#[derive(Debug, Clone)]
pub struct CourtMap {
    pub scene: Scene,
    pub image: FrameBuffer,
    pub marks: Vec<BounceMark>,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Pass-1 frames followed by pass-2 frames.
    pub frames: Vec<FrameBuffer>,
    /// Number of pass-1 frames at the head of `frames`.
    pub annotated_len: usize,
    pub attribution: AttributionSummary,
    pub scene_reports: Vec<SceneReport>,
    pub court_maps: Vec<CourtMap>,
}

impl PipelineOutput {
    /// Final side counters.
    pub fn counters(&self) -> SideCounters {
        self.attribution.counters
    }

    /// Pass-1 frames.
    pub fn annotated(&self) -> &[FrameBuffer] {
        &self.frames[..self.annotated_len]
    }

    /// Pass-2 frames.
    pub fn scene_frames(&self) -> &[FrameBuffer] {
        &self.frames[self.annotated_len..]
    }
}

/// Runs both passes over a clip.
pub struct Pipeline {
    config: PipelineConfig,
    court_base: OnceLock<FrameBuffer>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            court_base: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Blank canonical court, built on first use and shared by every scene.
    fn court_base(&self) -> &FrameBuffer {
        self.court_base.get_or_init(|| COURT_REFERENCE.court_image())
    }

    pub fn run(
        &self,
        frames: &[FrameBuffer],
        scenes: &[Scene],
        detections: &MatchDetections,
    ) -> PipelineOutput {
        self.run_with_progress(frames, scenes, detections, |_| {})
    }

    /// Run both passes, calling `progress` at stage boundaries and
    /// periodically during pass 1.
    pub fn run_with_progress<F>(
        &self,
        frames: &[FrameBuffer],
        scenes: &[Scene],
        detections: &MatchDetections,
        mut progress: F,
    ) -> PipelineOutput
    where
        F: FnMut(PipelineProgress),
    {
        let frame_count = frames.len();
        info!(frames = frame_count, scenes = scenes.len(), "Starting annotation pipeline");

        // Pass 1
        let (annotated, attribution) = self.annotate(frames, detections, &mut progress);

        // Pass 2
        let scenes: Vec<Scene> = scenes
            .iter()
            .map(|s| {
                let range = s.frames(frame_count);
                Scene::new(range.start, range.end)
            })
            .collect();
        let scene_reports = classify_scenes(&scenes, detections, &self.config.trackability);
        let trackable = scene_reports.iter().filter(|r| r.is_trackable()).count();
        info!(trackable, pass_through = scene_reports.len() - trackable, "Scenes classified");
        progress(PipelineProgress {
            stage: PipelineStage::Visualizing,
            done: 0,
            total: scene_reports.len(),
        });

        let renders = self.render_scenes(frames, &scene_reports, detections);

        // Concatenate
        let annotated_len = annotated.len();
        let mut out = annotated;
        out.reserve(renders.iter().map(|r| r.frames.len()).sum());
        let mut court_maps = Vec::with_capacity(trackable);
        for render in renders {
            out.extend(render.frames);
            if let Some(image) = render.court_map {
                court_maps.push(CourtMap {
                    scene: render.report.scene,
                    image,
                    marks: render.marks,
                });
            }
        }

        progress(PipelineProgress {
            stage: PipelineStage::Complete,
            done: scene_reports.len(),
            total: scene_reports.len(),
        });
        info!(
            output_frames = out.len(),
            top = attribution.counters.top,
            bottom = attribution.counters.bottom,
            court_maps = court_maps.len(),
            "Annotation pipeline complete"
        );

        PipelineOutput {
            frames: out,
            annotated_len,
            attribution,
            scene_reports,
            court_maps,
        }
    }

    /// Pass 1 over copies of the input frames.
    fn annotate<F>(
        &self,
        frames: &[FrameBuffer],
        detections: &MatchDetections,
        progress: &mut F,
    ) -> (Vec<FrameBuffer>, AttributionSummary)
    where
        F: FnMut(PipelineProgress),
    {
        let total = frames.len();
        let report_every = (total / 100).max(1);
        let mut attributor = HitAttributor::new();
        let mut annotated = Vec::with_capacity(total);

        for (i, frame) in frames.iter().enumerate() {
            let step = attributor.step(i, detections);
            let mut out = frame.clone();
            if let Err(e) = annotate_frame(&mut out, &step, &self.config.overlay) {
                warn!(frame = i + 1, error = %e, "Frame annotation failed, emitting frame as drawn");
            }
            annotated.push(out);

            if i % report_every == 0 {
                progress(PipelineProgress {
                    stage: PipelineStage::Annotating,
                    done: i,
                    total,
                });
            }
        }

        (annotated, attributor.finish())
    }

    /// Pass 2, in scene order.
    fn render_scenes(
        &self,
        frames: &[FrameBuffer],
        reports: &[SceneReport],
        detections: &MatchDetections,
    ) -> Vec<SceneRender> {
        let overlay = &self.config.overlay;
        // The court image is only needed for trackable scenes.
        let court_base = if reports.iter().any(SceneReport::is_trackable) {
            Some(self.court_base())
        } else {
            None
        };
        let blank = FrameBuffer::solid(1, 1, [0, 0, 0, 255]);
        let court_base = court_base.unwrap_or(&blank);

        if self.config.parallel_scenes {
            reports
                .par_iter()
                .map(|report| render_scene(frames, report, detections, court_base, overlay))
                .collect()
        } else {
            reports
                .iter()
                .map(|report| render_scene(frames, report, detections, court_base, overlay))
                .collect()
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
