//! Courtside - tennis match annotator.
//!
//! Reads a match clip and the detector sidecar JSON, draws the net line,
//! side-hit counters, ball trail and court keypoints, and writes the
//! annotated video.

mod config;
mod images;
mod summary;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::AppConfig;
use courtside_analysis::{
    classify_scenes, detect_scene_cuts, scenes_from_cuts, DetectionFile, HitAttributor,
    MatchDetections, Scene, SceneDetectConfig,
};
use courtside_core::{FrameBuffer, FrameRate};
use courtside_media::{ExportJob, MediaProbe, VideoCodec, VideoDecoder};
use courtside_overlay::{Pipeline, PipelineStage, COURT_REFERENCE};
use std::path::{Path, PathBuf};
use summary::RunSummary;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "courtside")]
#[command(about = "Annotate tennis match video with bounce attribution and ball trails")]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the annotated video.
    Annotate(AnnotateArgs),

    /// Count side hits from a detection file, without video.
    Count(CountArgs),

    /// Write the blank canonical court image.
    Court {
        /// Output PNG path.
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct AnnotateArgs {
    /// Input match video.
    #[arg(long)]
    input: PathBuf,

    /// Detector output (JSON).
    #[arg(long)]
    detections: PathBuf,

    /// Output video path.
    #[arg(long)]
    output: PathBuf,

    /// Run configuration (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to write one court map PNG per trackable scene.
    #[arg(long)]
    court_maps: Option<PathBuf>,

    /// Path to write the run summary (JSON).
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Mark only the current ball position instead of a trail.
    #[arg(long)]
    no_trace: bool,

    /// Ball positions in the trail.
    #[arg(long)]
    trace: Option<usize>,

    /// Calibrated-frame rate a scene must exceed to be visualized.
    #[arg(long)]
    min_track_rate: Option<f64>,

    /// Output codec.
    #[arg(long, value_enum)]
    codec: Option<CodecArg>,

    /// Output frame rate when the source rate cannot be read.
    #[arg(long, default_value = "30.0")]
    fallback_fps: f64,

    /// Render scenes one at a time.
    #[arg(long)]
    serial: bool,

    /// Decode at most this many frames.
    #[arg(long)]
    max_frames: Option<usize>,
}

#[derive(Debug, Clone, Args)]
struct CountArgs {
    /// Detector output (JSON).
    #[arg(long)]
    detections: PathBuf,

    /// Run configuration (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write the run summary (JSON).
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CodecArg {
    H264,
    Mpeg4,
}

impl From<CodecArg> for VideoCodec {
    fn from(arg: CodecArg) -> Self {
        match arg {
            CodecArg::H264 => VideoCodec::H264,
            CodecArg::Mpeg4 => VideoCodec::Mpeg4,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Annotate(args) => annotate(&args),
        Commands::Count(args) => count(&args),
        Commands::Court { out } => {
            images::write_png(&COURT_REFERENCE.court_image(), &out)?;
            println!("Wrote {}", out.display());
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn annotate_config(args: &AnnotateArgs) -> Result<AppConfig> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    let overlay = &mut config.pipeline.overlay;
    if args.no_trace {
        overlay.draw_trace = false;
    }
    if let Some(trace) = args.trace {
        overlay.trace_length = trace;
    }
    if let Some(rate) = args.min_track_rate {
        config.pipeline.trackability.min_track_rate = rate;
    }
    if let Some(codec) = args.codec {
        config.encode.codec = codec.into();
    }
    if args.serial {
        config.pipeline.parallel_scenes = false;
    }
    if args.max_frames.is_some() {
        config.decode.max_frames = args.max_frames;
    }
    Ok(config)
}

fn load_detections(path: &Path) -> Result<DetectionFile> {
    DetectionFile::load_from_file(path)
        .with_context(|| format!("Failed to load detections from {}", path.display()))
}

/// Scenes from the detection file, or cut detection over the decoded frames.
fn resolve_scenes(
    detections: &MatchDetections,
    frames: &[FrameBuffer],
    config: &SceneDetectConfig,
) -> Vec<Scene> {
    if let Some(scenes) = &detections.scenes {
        return scenes.clone();
    }
    let cuts = detect_scene_cuts(frames, config);
    let scenes = scenes_from_cuts(&cuts, frames.len());
    info!(cuts = cuts.len(), scenes = scenes.len(), "No scene list supplied, detected scenes");
    scenes
}

fn annotate(args: &AnnotateArgs) -> Result<()> {
    let config = annotate_config(args)?;
    if !courtside_media::ffmpeg_available() {
        bail!("ffmpeg was not found; install it or put it on PATH");
    }

    match MediaProbe::probe(&args.input) {
        Ok(probe) => {
            if let Some(video) = probe.primary_video() {
                info!(
                    codec = %video.codec,
                    width = video.width,
                    height = video.height,
                    frames = ?video.frame_count,
                    "Probed input"
                );
            }
        }
        Err(e) => debug!(error = %e, "Probe skipped"),
    }

    let file = load_detections(&args.detections)?;
    let clip = VideoDecoder::open(&args.input, &config.decode)
        .and_then(VideoDecoder::read_all)
        .with_context(|| format!("Failed to decode {}", args.input.display()))?;
    let frame_count = clip.frames.len();
    if file.frame_count != frame_count {
        warn!(
            detected = file.frame_count,
            decoded = frame_count,
            "Detection file was produced from a different frame count"
        );
    }

    let mut detections = file.detections;
    detections.normalize(frame_count);
    let scenes = resolve_scenes(&detections, &clip.frames, &config.scene_detect);

    let pipeline = Pipeline::new(config.pipeline.clone());
    let output = pipeline.run_with_progress(&clip.frames, &scenes, &detections, |p| {
        if p.stage == PipelineStage::Annotating {
            debug!(done = p.done, total = p.total, "Annotating");
        } else {
            debug!(stage = ?p.stage, scenes = p.total, "Pipeline stage");
        }
    });
    drop(clip.frames);

    let frame_rate = clip.frame_rate.unwrap_or_else(|| {
        let rate = FrameRate::from_fps_f64(args.fallback_fps).unwrap_or_default();
        warn!(%rate, "Source frame rate unknown, using fallback");
        rate
    });
    let job = ExportJob::for_frames(&args.output, &output.frames, frame_rate, config.encode.clone())?;
    job.run(&output.frames, |p| {
        debug!(
            frame = p.current_frame,
            total = p.total_frames,
            fps = p.fps,
            "Encoding"
        );
    })
    .with_context(|| format!("Failed to encode {}", args.output.display()))?;

    if let Some(dir) = &args.court_maps {
        images::write_court_maps(&output.court_maps, dir)?;
    }

    let summary = RunSummary::from_output(&output);
    if let Some(path) = &args.summary {
        summary.write_json(path)?;
    }
    print!("{}", summary.render_text());
    println!("Wrote {}", args.output.display());
    Ok(())
}

fn count(args: &CountArgs) -> Result<()> {
    let config = AppConfig::load(args.config.as_deref())?;
    let file = load_detections(&args.detections)?;
    if file.frame_count == 0 {
        bail!("Detection file reports no frames");
    }

    let mut detections = file.detections;
    detections.normalize(file.frame_count);
    let attribution = HitAttributor::run(file.frame_count, &detections);
    let scenes = detections
        .scenes
        .clone()
        .unwrap_or_else(|| vec![Scene::new(0, file.frame_count)]);
    let reports = classify_scenes(&scenes, &detections, &config.pipeline.trackability);

    let summary = RunSummary::from_attribution(file.frame_count, &attribution, reports);
    if let Some(path) = &args.summary {
        summary.write_json(path)?;
    }
    print!("{}", summary.render_text());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotate_args(extra: &[&str]) -> AnnotateArgs {
        let mut argv = vec![
            "courtside",
            "annotate",
            "--input",
            "in.mp4",
            "--detections",
            "d.json",
            "--output",
            "out.mp4",
        ];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Annotate(args) => args,
            _ => panic!("expected annotate"),
        }
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = annotate_args(&["--no-trace", "--trace", "12", "--codec", "mpeg4", "--serial"]);
        let config = annotate_config(&args).unwrap();
        assert!(!config.pipeline.overlay.draw_trace);
        assert_eq!(config.pipeline.overlay.trace_length, 12);
        assert_eq!(config.encode.codec, VideoCodec::Mpeg4);
        assert!(!config.pipeline.parallel_scenes);
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = annotate_config(&annotate_args(&[])).unwrap();
        assert!(config.pipeline.overlay.draw_trace);
        assert_eq!(config.encode.codec, VideoCodec::H264);
        assert_eq!(config.decode.max_frames, None);
    }

    #[test]
    fn test_scene_list_from_file_wins() {
        let detections = MatchDetections {
            scenes: Some(vec![Scene::new(0, 2), Scene::new(2, 4)]),
            ..Default::default()
        };
        let frames: Vec<FrameBuffer> =
            (0..4).map(|_| FrameBuffer::solid(8, 8, [0, 0, 0, 255])).collect();
        let scenes = resolve_scenes(&detections, &frames, &SceneDetectConfig::default());
        assert_eq!(scenes.len(), 2);
    }

    #[test]
    fn test_scene_fallback_covers_clip() {
        let frames: Vec<FrameBuffer> =
            (0..4).map(|_| FrameBuffer::solid(8, 8, [0, 0, 0, 255])).collect();
        let scenes =
            resolve_scenes(&MatchDetections::default(), &frames, &SceneDetectConfig::default());
        assert_eq!(scenes, vec![Scene::new(0, 4)]);
    }
}
