use crate::foundation::core::Grid;
use crate::foundation::error::{Raw2GifError, Raw2GifResult};

/// Nominal display range `[min, max]` of a normalized field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    /// Value mapped to the first colormap entry.
    pub min: f32,
    /// Value mapped to the last colormap entry.
    pub max: f32,
}

impl ValueRange {
    /// Create a range. `min` may equal `max`.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// `max - min`, or `1.0` when that is zero so callers can always divide by it.
    pub fn span(self) -> f32 {
        let span = self.max - self.min;
        if span == 0.0 { 1.0 } else { span }
    }
}

/// Scaling applied by a [`Normalizer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleMode {
    /// `log10(|v + eps| / divisor)` over `[-decades, 0]`.
    Log {
        /// Orders of magnitude shown.
        decades: f32,
    },
    /// `|v + eps| / divisor` over `[0, 1]`.
    Linear,
}

/// Grid values scaled into the display domain, plus the range they are nominally in.
///
/// Values are not clamped; out-of-range samples are clamped by the colorizer.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedField {
    width: usize,
    height: usize,
    values: Vec<f32>,
    range: ValueRange,
}

impl NormalizedField {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Scaled values, row-major, same layout as the source [`Grid`].
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Scaled value at `row`, `col`.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.values[row * self.width + col]
    }

    /// Nominal range for the scaling mode that produced this field.
    pub fn range(&self) -> ValueRange {
        self.range
    }
}

/// Maps raw grid samples into a bounded display field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normalizer {
    divisor: f32,
    mode: ScaleMode,
    epsilon: f32,
}

impl Normalizer {
    /// Offset added to every sample so that exact zeros stay finite under `log10`.
    pub const DEFAULT_EPSILON: f32 = f32::MIN_POSITIVE;

    /// Create a normalizer. `decades == 0` selects linear mode.
    ///
    /// `divisor` must be finite and positive; `decades` must be finite and non-negative.
    pub fn new(divisor: f32, decades: f32) -> Raw2GifResult<Self> {
        if !divisor.is_finite() || divisor <= 0.0 {
            return Err(Raw2GifError::validation(format!(
                "normalization divisor must be finite and positive, got {divisor}"
            )));
        }
        if !decades.is_finite() || decades < 0.0 {
            return Err(Raw2GifError::validation(format!(
                "decades must be finite and >= 0, got {decades}"
            )));
        }
        let mode = if decades == 0.0 {
            ScaleMode::Linear
        } else {
            ScaleMode::Log { decades }
        };
        Ok(Self {
            divisor,
            mode,
            epsilon: Self::DEFAULT_EPSILON,
        })
    }

    /// Replace the epsilon offset.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// The scaling mode in effect.
    pub fn mode(&self) -> ScaleMode {
        self.mode
    }

    /// Nominal output range for this normalizer.
    pub fn range(&self) -> ValueRange {
        match self.mode {
            ScaleMode::Log { decades } => ValueRange::new(-decades, 0.0),
            ScaleMode::Linear => ValueRange::new(0.0, 1.0),
        }
    }

    /// Scale one sample.
    pub fn scale(&self, v: f32) -> f32 {
        let magnitude = (v + self.epsilon).abs() / self.divisor;
        match self.mode {
            ScaleMode::Log { .. } => magnitude.log10(),
            ScaleMode::Linear => magnitude,
        }
    }

    /// Scale every sample of `grid`.
    pub fn normalize(&self, grid: &Grid) -> NormalizedField {
        NormalizedField {
            width: grid.width(),
            height: grid.height(),
            values: grid.values().iter().map(|&v| self.scale(v)).collect(),
            range: self.range(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/field.rs"]
mod tests;
