use crate::colormap::lut::Colormap;
use crate::foundation::core::FrameRgb;
use crate::foundation::error::{Raw2GifError, Raw2GifResult};
use crate::normalize::field::{NormalizedField, ValueRange};

/// Colorize `field` over its own nominal range.
pub fn colorize(field: &NormalizedField, cmap: &Colormap) -> Raw2GifResult<FrameRgb> {
    colorize_in_range(field, field.range(), cmap)
}

/// Colorize `field`, mapping `range.min` to the first colormap entry and `range.max` to the last.
///
/// Positions are clamped to `[0, 1]` here and nowhere earlier. A zero-width range is treated as
/// width 1. Raster row `r` is field row `r`.
pub fn colorize_in_range(
    field: &NormalizedField,
    range: ValueRange,
    cmap: &Colormap,
) -> Raw2GifResult<FrameRgb> {
    let width = u32::try_from(field.width())
        .map_err(|_| Raw2GifError::validation("frame width does not fit in u32"))?;
    let height = u32::try_from(field.height())
        .map_err(|_| Raw2GifError::validation("frame height does not fit in u32"))?;

    let span = range.span();
    let mut data = Vec::with_capacity(field.values().len() * 3);
    for &v in field.values() {
        let t = ((v - range.min) / span).clamp(0.0, 1.0);
        data.extend_from_slice(&cmap.sample(t));
    }

    Ok(FrameRgb {
        width,
        height,
        data,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/colorize.rs"]
mod tests;
