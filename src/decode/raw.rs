//! Raw frame file codec.
//!
//! Layout, all values little-endian IEEE-754 `f32`:
//!
//! ```text
//! offset 0: size_x  (truncated to an integer)
//! offset 4: size_y  (truncated to an integer)
//! offset 8: size_x * size_y samples, x varying fastest
//! ```
//!
//! Reading the body as a column-major `(size_x, size_y)` matrix, transposing it and reversing the
//! row order yields a [`Grid`] whose row 0 is the bottom row of the plot. Simulators write the
//! top row of the domain first.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Grid;
use crate::foundation::error::{Raw2GifError, Raw2GifResult};

/// Size of the `(size_x, size_y)` header in bytes.
pub const HEADER_LEN: usize = 8;

const SAMPLE_LEN: usize = std::mem::size_of::<f32>();

/// Decode a raw frame from memory.
///
/// Trailing bytes beyond `size_x * size_y` samples are ignored.
pub fn decode_raw_frame(bytes: &[u8]) -> Raw2GifResult<Grid> {
    if bytes.len() < HEADER_LEN {
        return Err(Raw2GifError::format(format!(
            "could not read header: need {HEADER_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    let size_x = header_dim(read_f32(&bytes[0..4]), "size_x")?;
    let size_y = header_dim(read_f32(&bytes[4..8]), "size_y")?;
    let expected = size_x
        .checked_mul(size_y)
        .ok_or_else(|| Raw2GifError::format(format!("header {size_x}x{size_y} overflows")))?;

    let body = &bytes[HEADER_LEN..];
    let available = body.len() / SAMPLE_LEN;
    if available < expected {
        return Err(Raw2GifError::format(format!(
            "body holds {available} samples, header {size_x}x{size_y} needs {expected}"
        )));
    }

    let samples: Vec<f32> = body
        .chunks_exact(SAMPLE_LEN)
        .take(expected)
        .map(read_f32)
        .collect();

    // Each run of `size_x` samples is one column of the (size_x, size_y) matrix, i.e. one row
    // after the transpose; the flip puts the last-written run at row 0.
    let data: Vec<f32> = samples
        .chunks_exact(size_x)
        .rev()
        .flatten()
        .copied()
        .collect();
    Grid::new(size_x, size_y, data)
}

/// Read and decode a raw frame file.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn read_raw_frame(path: impl AsRef<Path>) -> Raw2GifResult<Grid> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("read raw frame '{}'", path.display()))?;
    let grid = decode_raw_frame(&bytes).map_err(|e| match e {
        Raw2GifError::Format(msg) => Raw2GifError::format(format!("{}: {msg}", path.display())),
        other => other,
    })?;
    tracing::debug!(
        width = grid.width(),
        height = grid.height(),
        "decoded raw frame"
    );
    Ok(grid)
}

/// Encode a grid in the raw frame layout. Inverse of [`decode_raw_frame`].
pub fn encode_raw_frame(grid: &Grid) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + grid.values().len() * SAMPLE_LEN);
    out.extend_from_slice(&(grid.width() as f32).to_le_bytes());
    out.extend_from_slice(&(grid.height() as f32).to_le_bytes());
    for row in (0..grid.height()).rev() {
        for v in grid.row(row) {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }
    out
}

/// Write a grid to `path` in the raw frame layout.
pub fn write_raw_frame(path: impl AsRef<Path>, grid: &Grid) -> Raw2GifResult<()> {
    let path = path.as_ref();
    std::fs::write(path, encode_raw_frame(grid))
        .with_context(|| format!("write raw frame '{}'", path.display()))?;
    Ok(())
}

fn read_f32(b: &[u8]) -> f32 {
    f32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

fn header_dim(v: f32, name: &str) -> Raw2GifResult<usize> {
    if !v.is_finite() || v.trunc() < 1.0 {
        return Err(Raw2GifError::format(format!(
            "header {name} must be a positive size, got {v}"
        )));
    }
    Ok(v.trunc() as usize)
}

#[cfg(test)]
#[path = "../../tests/unit/decode/raw.rs"]
mod tests;
