//! Courtside Overlay - frame compositing and the annotation pipeline.
//!
//! Draws match annotations into `Rgba8` frames on the CPU:
//! - Net reference line and running side-hit counters on every frame
//! - Ball trail, ball box and court keypoints for trackable scenes
//! - Bounce heat map on a canonical top-down court image
//!
//! [`Pipeline`] sequences both passes and concatenates their output.

pub mod court;
pub mod draw;
pub mod error;
pub mod overlay;
pub mod pipeline;
pub mod scene_view;
pub mod text;

pub use court::{CourtLine, CourtReference, COURT_REFERENCE};
pub use error::{RenderError, RenderResult};
pub use overlay::{annotate_frame, OverlayConfig};
pub use pipeline::{
    CourtMap, Pipeline, PipelineConfig, PipelineOutput, PipelineProgress, PipelineStage,
};
pub use scene_view::{render_scene, BounceMark, SceneRender};
pub use text::TextStyle;
