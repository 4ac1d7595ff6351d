use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::decode::raw::write_raw_frame;
use crate::foundation::core::Grid;
use crate::foundation::error::{Raw2GifError, Raw2GifResult};

/// A Gaussian pulse drifting across the domain and decaying by a decade over the sequence.
///
/// Peak magnitude is 1.0 in the first frame, so the default log scaling shows the whole run.
pub fn gaussian_pulse(width: usize, height: usize, frames: usize) -> Raw2GifResult<Vec<Grid>> {
    if frames == 0 {
        return Err(Raw2GifError::validation("synthetic sequence needs at least one frame"));
    }
    if width == 0 || height == 0 {
        return Err(Raw2GifError::validation(format!(
            "synthetic grid dimensions must be non-zero, got {width}x{height}"
        )));
    }
    let sigma = (width.min(height) as f32 / 6.0).max(0.5);
    let steps = (frames.max(2) - 1) as f32;

    (0..frames)
        .map(|k| {
            let phase = k as f32 / steps;
            let cx = phase * (width - 1) as f32;
            let cy = (height - 1) as f32 / 2.0;
            let peak = 10f32.powf(-phase);
            let data = (0..height)
                .flat_map(|row| {
                    (0..width).map(move |col| {
                        let dx = col as f32 - cx;
                        let dy = row as f32 - cy;
                        peak * (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp()
                    })
                })
                .collect();
            Grid::new(width, height, data)
        })
        .collect()
}

/// Write `grids` into `dir` as `<prefix>.<n>.dat`, the naming used by the simulator's snapshots.
pub fn write_sequence(dir: &Path, prefix: &str, grids: &[Grid]) -> Raw2GifResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output directory '{}'", dir.display()))?;
    grids
        .iter()
        .enumerate()
        .map(|(n, grid)| {
            let path = dir.join(format!("{prefix}.{n}.dat"));
            write_raw_frame(&path, grid)?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/synth.rs"]
mod tests;
