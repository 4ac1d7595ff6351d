//! raw2gif turns a directory of raw 2-D simulation snapshots into an animated GIF.
//!
//! Each snapshot is decoded into a [`Grid`], scaled by a [`Normalizer`] (log decades or linear),
//! mapped through a discrete [`Colormap`], reduced to a 256-color palette and appended to the
//! animation. [`convert`] runs the whole pipeline; the stages are public for callers that want
//! a single frame or their own [`FrameSink`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Colormap lookup tables.
pub mod colormap;
/// Raw snapshot decoding.
pub mod decode;
pub mod encode;
/// Value scaling.
pub mod normalize;
/// End-to-end conversion.
pub mod pipeline;
/// Palette quantization.
pub mod quantize;
/// Field to raster conversion.
pub mod render;
pub mod sequence;

pub use crate::foundation::core::{FrameRgb, Grid};
pub use crate::foundation::error::{Raw2GifError, Raw2GifResult};

pub use crate::colormap::lut::Colormap;
pub use crate::decode::raw::{decode_raw_frame, read_raw_frame};
pub use crate::encode::gif::{AnimationOpts, GifSink, assemble_gif, encode_gif, write_gif};
pub use crate::encode::png::save_frame_png;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::normalize::field::{NormalizedField, Normalizer, ScaleMode, ValueRange};
pub use crate::pipeline::convert::{
    ConvertOpts, ConvertStats, FrameRenderer, convert, render_raw_to_png,
};
pub use crate::quantize::median_cut::{IndexedFrame, quantize};
pub use crate::render::colorize::colorize;
pub use crate::sequence::discover::discover_frames;
pub use crate::sequence::natural::natural_sort;
