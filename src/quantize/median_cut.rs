use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use crate::foundation::core::FrameRgb;
use crate::foundation::error::{Raw2GifError, Raw2GifResult};

/// Largest palette an indexed frame can carry.
pub const MAX_PALETTE: usize = 256;

/// A frame stored as palette indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Palette, at most [`MAX_PALETTE`] entries.
    pub palette: Vec<[u8; 3]>,
    /// One palette index per pixel, row-major.
    pub indices: Vec<u8>,
}

impl IndexedFrame {
    /// Resolved color at pixel `(x, y)`.
    pub fn color_at(&self, x: u32, y: u32) -> [u8; 3] {
        let i = y as usize * self.width as usize + x as usize;
        self.palette[self.indices[i] as usize]
    }

    /// Expand back into an RGB raster.
    pub fn to_rgb(&self) -> FrameRgb {
        let mut data = Vec::with_capacity(self.indices.len() * 3);
        for &i in &self.indices {
            data.extend_from_slice(&self.palette[i as usize]);
        }
        FrameRgb {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

/// Reduce `frame` to at most `max_colors` colors.
///
/// Frames that already fit get an exact palette sorted by color. Larger color sets are split by
/// median cut: the box with the widest channel extent is cut at its population-weighted median
/// until `max_colors` boxes exist, and each box contributes its weighted mean color. The result is
/// a pure function of the input.
pub fn quantize(frame: &FrameRgb, max_colors: usize) -> Raw2GifResult<IndexedFrame> {
    if max_colors == 0 || max_colors > MAX_PALETTE {
        return Err(Raw2GifError::validation(format!(
            "palette size must be in 1..={MAX_PALETTE}, got {max_colors}"
        )));
    }
    let pixel_count = frame.width as usize * frame.height as usize;
    if frame.data.len() != pixel_count * 3 {
        return Err(Raw2GifError::validation(format!(
            "frame data has {} bytes, expected {} for {}x{} rgb8",
            frame.data.len(),
            pixel_count * 3,
            frame.width,
            frame.height
        )));
    }

    let mut histogram = BTreeMap::<[u8; 3], u32>::new();
    for px in frame.pixels() {
        *histogram.entry(px).or_default() += 1;
    }
    let mut colors: Vec<([u8; 3], u32)> = histogram.into_iter().collect();

    let (palette, lookup) = if colors.len() <= max_colors {
        exact_palette(&colors)
    } else {
        median_cut(&mut colors, max_colors)
    };

    let indices = frame.pixels().map(|px| lookup[&px]).collect();
    Ok(IndexedFrame {
        width: frame.width,
        height: frame.height,
        palette,
        indices,
    })
}

type Lookup = HashMap<[u8; 3], u8>;

fn exact_palette(colors: &[([u8; 3], u32)]) -> (Vec<[u8; 3]>, Lookup) {
    let palette: Vec<[u8; 3]> = colors.iter().map(|(c, _)| *c).collect();
    let lookup = palette
        .iter()
        .enumerate()
        .map(|(i, c)| (*c, i as u8))
        .collect();
    (palette, lookup)
}

fn median_cut(colors: &mut [([u8; 3], u32)], max_colors: usize) -> (Vec<[u8; 3]>, Lookup) {
    let mut boxes: Vec<Range<usize>> = vec![0..colors.len()];

    while boxes.len() < max_colors {
        let Some((box_idx, channel)) = widest_box(colors, &boxes) else {
            break;
        };
        let range = boxes[box_idx].clone();
        let slice = &mut colors[range.clone()];
        slice.sort_by_key(|(c, _)| (c[channel], *c));

        let split = range.start + weighted_median(slice);
        boxes[box_idx] = range.start..split;
        boxes.insert(box_idx + 1, split..range.end);
    }

    let mut palette = Vec::with_capacity(boxes.len());
    let mut lookup = Lookup::with_capacity(colors.len());
    for (i, range) in boxes.iter().enumerate() {
        let entries = &colors[range.clone()];
        palette.push(weighted_mean(entries));
        for (c, _) in entries {
            lookup.insert(*c, i as u8);
        }
    }
    (palette, lookup)
}

/// Box with the largest single-channel extent, and that channel. Ties keep the earliest box.
fn widest_box(colors: &[([u8; 3], u32)], boxes: &[Range<usize>]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, u8)> = None;
    for (i, range) in boxes.iter().enumerate() {
        if range.len() < 2 {
            continue;
        }
        let entries = &colors[range.clone()];
        for ch in 0..3 {
            let (lo, hi) = entries
                .iter()
                .fold((u8::MAX, u8::MIN), |(lo, hi), (c, _)| {
                    (lo.min(c[ch]), hi.max(c[ch]))
                });
            let extent = hi - lo;
            if best.is_none_or(|(_, _, e)| extent > e) {
                best = Some((i, ch, extent));
            }
        }
    }
    best.map(|(i, ch, _)| (i, ch))
}

/// Split offset in `1..len` placing half the population on each side.
fn weighted_median(sorted: &[([u8; 3], u32)]) -> usize {
    let total: u64 = sorted.iter().map(|(_, n)| u64::from(*n)).sum();
    let mut acc = 0u64;
    for (i, (_, n)) in sorted.iter().enumerate() {
        acc += u64::from(*n);
        if acc * 2 >= total {
            return (i + 1).clamp(1, sorted.len() - 1);
        }
    }
    sorted.len() - 1
}

fn weighted_mean(entries: &[([u8; 3], u32)]) -> [u8; 3] {
    let total: u64 = entries.iter().map(|(_, n)| u64::from(*n)).sum();
    let mut sum = [0u64; 3];
    for (c, n) in entries {
        for (s, v) in sum.iter_mut().zip(c) {
            *s += u64::from(*v) * u64::from(*n);
        }
    }
    sum.map(|s| ((s + total / 2) / total) as u8)
}

#[cfg(test)]
#[path = "../../tests/unit/quantize/median_cut.rs"]
mod tests;
