use std::path::{Path, PathBuf};

use crate::encode::gif::ensure_parent_dir;
use crate::foundation::core::FrameRgb;
use crate::foundation::error::{Raw2GifError, Raw2GifResult};

/// Write an RGB frame as a PNG at `path`, creating the parent directory if needed.
pub fn save_frame_png(path: impl AsRef<Path>, frame: &FrameRgb) -> Raw2GifResult<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .map_err(|e| Raw2GifError::encode(format!("write png '{}': {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "exported frame");
    Ok(())
}

/// Export path for the frame decoded from `input`: `<dir>/<input stem>.png`.
///
/// Only the last extension is dropped, so `sim.12.dat` exports as `sim.12.png`.
pub fn export_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    dir.join(format!("{stem}.png"))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
