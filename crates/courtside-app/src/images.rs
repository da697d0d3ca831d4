//! PNG output for court maps.

use anyhow::{anyhow, Context, Result};
use courtside_core::{FrameBuffer, PixelFormat};
use courtside_overlay::CourtMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write an `Rgba8` frame as PNG.
pub fn write_png(frame: &FrameBuffer, path: &Path) -> Result<()> {
    if frame.format != PixelFormat::Rgba8 {
        return Err(anyhow!("Cannot write {:?} frame as PNG", frame.format));
    }
    let image = image::RgbaImage::from_raw(frame.width, frame.height, frame.to_packed_bytes())
        .ok_or_else(|| anyhow!("Frame buffer does not match {}x{}", frame.width, frame.height))?;
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// File name of a scene's court map, ordered by scene.
pub fn court_map_file_name(index: usize, map: &CourtMap) -> String {
    format!(
        "court_map_{:03}_{}-{}.png",
        index, map.scene.start, map.scene.end
    )
}

/// Write every court map into `dir`, creating it if needed.
pub fn write_court_maps(maps: &[CourtMap], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(maps.len());
    for (i, map) in maps.iter().enumerate() {
        let path = dir.join(court_map_file_name(i, map));
        write_png(&map.image, &path)?;
        written.push(path);
    }
    info!(count = written.len(), dir = %dir.display(), "Court maps written");
    Ok(written)
}
