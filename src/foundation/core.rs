use crate::foundation::error::{Raw2GifError, Raw2GifResult};

/// Rectangular grid of simulation samples.
///
/// Stored row-major with `height` rows of `width` samples. Row 0 is the row drawn at the bottom
/// of a lower-left-origin plot.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Grid {
    /// Create a grid from row-major samples. `data.len()` must equal `width * height`.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Raw2GifResult<Self> {
        if width == 0 || height == 0 {
            return Err(Raw2GifError::validation(format!(
                "grid dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            Raw2GifError::validation(format!("grid dimensions {width}x{height} overflow"))
        })?;
        if data.len() != expected {
            return Err(Raw2GifError::validation(format!(
                "grid data has {} samples, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grid from nested rows (row 0 first). All rows must have equal length.
    pub fn from_rows(rows: &[Vec<f32>]) -> Raw2GifResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != width) {
            return Err(Raw2GifError::validation("grid rows must have equal length"));
        }
        Self::new(width, height, rows.concat())
    }

    /// Number of columns (`size_x`).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows (`size_y`).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample at `row`, `col`.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    /// Borrow one row.
    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    /// All samples, row-major.
    pub fn values(&self) -> &[f32] {
        &self.data
    }

    /// Copy into nested rows (row 0 first).
    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        self.data.chunks_exact(self.width).map(<[f32]>::to_vec).collect()
    }
}

/// An 8-bit RGB raster, tightly packed, row-major, no alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, `width * height * 3` long.
    pub data: Vec<u8>,
}

impl FrameRgb {
    /// Return the RGB triple at pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Iterate over the pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }
}
