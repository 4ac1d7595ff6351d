//! Named colormaps built from piecewise-linear segment tables.
//!
//! Each channel is described by anchors `(x, y_left, y_right)` over `x` in `[0, 1]`. A table of
//! `N` levels samples those segments at `N` evenly spaced positions, so `jet` at 128 levels gives
//! the familiar blue-cyan-yellow-red ramp with 128 distinct steps.

use crate::foundation::error::{Raw2GifError, Raw2GifResult};

/// Default colormap name.
pub const DEFAULT_COLORMAP: &str = "jet";

/// Default number of levels in the lookup table.
pub const DEFAULT_LEVELS: usize = 128;

/// Color returned for non-finite samples.
pub const BAD_COLOR: [u8; 3] = [0, 0, 0];

type Anchors = &'static [(f64, f64, f64)];

struct Segments {
    red: Anchors,
    green: Anchors,
    blue: Anchors,
}

const JET: Segments = Segments {
    red: &[
        (0.0, 0.0, 0.0),
        (0.35, 0.0, 0.0),
        (0.66, 1.0, 1.0),
        (0.89, 1.0, 1.0),
        (1.0, 0.5, 0.5),
    ],
    green: &[
        (0.0, 0.0, 0.0),
        (0.125, 0.0, 0.0),
        (0.375, 1.0, 1.0),
        (0.64, 1.0, 1.0),
        (0.91, 0.0, 0.0),
        (1.0, 0.0, 0.0),
    ],
    blue: &[
        (0.0, 0.5, 0.5),
        (0.11, 1.0, 1.0),
        (0.34, 1.0, 1.0),
        (0.65, 0.0, 0.0),
        (1.0, 0.0, 0.0),
    ],
};

const HOT: Segments = Segments {
    red: &[(0.0, 0.0416, 0.0416), (0.365079, 1.0, 1.0), (1.0, 1.0, 1.0)],
    green: &[
        (0.0, 0.0, 0.0),
        (0.365079, 0.0, 0.0),
        (0.746032, 1.0, 1.0),
        (1.0, 1.0, 1.0),
    ],
    blue: &[(0.0, 0.0, 0.0), (0.746032, 0.0, 0.0), (1.0, 1.0, 1.0)],
};

const RAMP_UP: Anchors = &[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0)];
const RAMP_DOWN: Anchors = &[(0.0, 1.0, 1.0), (1.0, 0.0, 0.0)];
const ZERO: Anchors = &[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)];
const ONE: Anchors = &[(0.0, 1.0, 1.0), (1.0, 1.0, 1.0)];

const GRAY: Segments = Segments {
    red: RAMP_UP,
    green: RAMP_UP,
    blue: RAMP_UP,
};

const COOL: Segments = Segments {
    red: RAMP_UP,
    green: RAMP_DOWN,
    blue: ONE,
};

const SPRING: Segments = Segments {
    red: ONE,
    green: RAMP_UP,
    blue: RAMP_DOWN,
};

const SUMMER: Segments = Segments {
    red: RAMP_UP,
    green: &[(0.0, 0.5, 0.5), (1.0, 1.0, 1.0)],
    blue: &[(0.0, 0.4, 0.4), (1.0, 0.4, 0.4)],
};

const AUTUMN: Segments = Segments {
    red: ONE,
    green: RAMP_UP,
    blue: ZERO,
};

const WINTER: Segments = Segments {
    red: ZERO,
    green: RAMP_UP,
    blue: &[(0.0, 1.0, 1.0), (1.0, 0.5, 0.5)],
};

fn segments(name: &str) -> Option<&'static Segments> {
    Some(match name {
        "jet" => &JET,
        "hot" => &HOT,
        "gray" | "grey" => &GRAY,
        "cool" => &COOL,
        "spring" => &SPRING,
        "summer" => &SUMMER,
        "autumn" => &AUTUMN,
        "winter" => &WINTER,
        _ => return None,
    })
}

/// An ordered table of RGB colors indexed by a position in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Colormap {
    name: String,
    colors: Vec<[u8; 3]>,
}

impl Colormap {
    /// Names accepted by [`Colormap::named`]. Any of them may carry an `_r` suffix for the
    /// reversed table.
    pub const NAMES: &'static [&'static str] = &[
        "jet", "hot", "gray", "grey", "cool", "spring", "summer", "autumn", "winter",
    ];

    /// Look up a named colormap and discretize it to `levels` entries.
    pub fn named(name: &str, levels: usize) -> Raw2GifResult<Self> {
        if levels == 0 {
            return Err(Raw2GifError::validation("colormap levels must be >= 1"));
        }
        let key = name.to_ascii_lowercase();
        let (base, reversed) = match key.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (key.as_str(), false),
        };
        let segs = segments(base).ok_or_else(|| {
            Raw2GifError::validation(format!(
                "unknown colormap '{name}' (known: {})",
                Self::NAMES.join(", ")
            ))
        })?;

        let mut colors = discretize(segs, levels);
        if reversed {
            colors.reverse();
        }
        Ok(Self { name: key, colors })
    }

    /// Build a colormap from explicit colors. `colors` must be non-empty.
    pub fn from_colors(name: impl Into<String>, colors: Vec<[u8; 3]>) -> Raw2GifResult<Self> {
        if colors.is_empty() {
            return Err(Raw2GifError::validation("colormap needs at least one color"));
        }
        Ok(Self {
            name: name.into(),
            colors,
        })
    }

    /// Colormap name as given (lowercased for named maps).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; colormaps hold at least one color.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All entries, first to last.
    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// Color for position `t`.
    ///
    /// `t` is mapped to entry `floor(t * N)`; `t == 1.0` and anything above selects the last entry
    /// and anything below zero the first. Non-finite `t` yields [`BAD_COLOR`].
    pub fn sample(&self, t: f32) -> [u8; 3] {
        if !t.is_finite() {
            return BAD_COLOR;
        }
        let n = self.colors.len();
        let x = t * n as f32;
        let idx = if x <= 0.0 {
            0
        } else {
            (x as usize).min(n - 1)
        };
        self.colors[idx]
    }
}

impl Default for Colormap {
    /// 128-level `jet`.
    fn default() -> Self {
        Self {
            name: DEFAULT_COLORMAP.to_string(),
            colors: discretize(&JET, DEFAULT_LEVELS),
        }
    }
}

fn discretize(segs: &Segments, levels: usize) -> Vec<[u8; 3]> {
    let red = lookup_table(segs.red, levels);
    let green = lookup_table(segs.green, levels);
    let blue = lookup_table(segs.blue, levels);
    (0..levels)
        .map(|i| [to_u8(red[i]), to_u8(green[i]), to_u8(blue[i])])
        .collect()
}

fn to_u8(v: f64) -> u8 {
    // Truncates, so only an exact 1.0 reaches 255.
    (v * 255.0) as u8
}

/// Sample one channel's anchors at `n` evenly spaced positions over `[0, 1]`.
fn lookup_table(anchors: Anchors, n: usize) -> Vec<f64> {
    let last = anchors[anchors.len() - 1];
    if n == 1 {
        return vec![last.1];
    }

    let step = 1.0 / (n - 1) as f64;
    let mut lut = Vec::with_capacity(n);
    lut.push(anchors[0].2);
    for k in 1..n - 1 {
        let x = k as f64 * step;
        let hi = anchors
            .iter()
            .position(|a| a.0 >= x)
            .unwrap_or(anchors.len() - 1)
            .max(1);
        let (x0, _, y0_right) = anchors[hi - 1];
        let (x1, y1_left, _) = anchors[hi];
        let frac = (x - x0) / (x1 - x0);
        lut.push((frac * (y1_left - y0_right) + y0_right).clamp(0.0, 1.0));
    }
    lut.push(last.1);
    lut
}

#[cfg(test)]
#[path = "../../tests/unit/colormap/lut.rs"]
mod tests;
