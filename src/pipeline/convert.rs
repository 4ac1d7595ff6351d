use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rayon::prelude::*;

use crate::colormap::lut::{Colormap, DEFAULT_COLORMAP, DEFAULT_LEVELS};
use crate::decode::raw::read_raw_frame;
use crate::encode::gif::{AnimationOpts, write_gif};
use crate::encode::png::{export_path, save_frame_png};
use crate::foundation::core::{FrameRgb, Grid};
use crate::foundation::error::{Raw2GifError, Raw2GifResult};
use crate::normalize::field::Normalizer;
use crate::quantize::median_cut::{IndexedFrame, MAX_PALETTE, quantize};
use crate::render::colorize::colorize;
use crate::sequence::discover::{DEFAULT_PATTERN, discover_frames};

/// Options for [`convert`] and [`render_raw_to_png`].
///
/// Deserializes from JSON; every field is optional and falls back to its default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertOpts {
    /// Samples are divided by this before scaling, typically the peak over all frames.
    pub divisor: f32,
    /// Orders of magnitude shown in log mode; `0` selects linear mode.
    pub decades: f32,
    /// Colormap name (see [`Colormap::NAMES`]).
    pub colormap: String,
    /// Number of discrete colormap levels.
    pub colormap_levels: usize,
    /// Seconds per animation frame.
    pub frame_duration_secs: f64,
    /// Animation loop count; `0` loops forever.
    pub loop_count: u16,
    /// Also write each unquantized frame as `<stem>.png` into this directory.
    pub export_frames_dir: Option<PathBuf>,
    /// Enable GIF size optimizations.
    pub optimize: bool,
    /// Glob pattern selecting input files inside the input directory.
    pub pattern: String,
    /// Palette size per quantized frame (at most 256).
    pub max_colors: usize,
    /// Render frames on a rayon thread pool.
    pub parallel: bool,
    /// Worker threads for parallel mode; `None` uses rayon's default.
    pub threads: Option<usize>,
}

impl Default for ConvertOpts {
    fn default() -> Self {
        Self {
            divisor: 1.0,
            decades: 3.0,
            colormap: DEFAULT_COLORMAP.to_string(),
            colormap_levels: DEFAULT_LEVELS,
            frame_duration_secs: 0.1,
            loop_count: 0,
            export_frames_dir: None,
            optimize: true,
            pattern: DEFAULT_PATTERN.to_string(),
            max_colors: MAX_PALETTE,
            parallel: false,
            threads: None,
        }
    }
}

impl ConvertOpts {
    /// Load options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Raw2GifResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            Raw2GifError::validation(format!("open options JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Parse options from JSON.
    pub fn from_reader(r: impl Read) -> Raw2GifResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| Raw2GifError::validation(format!("parse options JSON: {e}")))
    }

    /// Animation settings derived from these options.
    pub fn animation(&self) -> AnimationOpts {
        AnimationOpts {
            frame_duration_secs: self.frame_duration_secs,
            loop_count: self.loop_count,
            optimize: self.optimize,
        }
    }

    /// Check every option and build the per-frame renderer.
    pub fn renderer(&self) -> Raw2GifResult<FrameRenderer> {
        if self.max_colors == 0 || self.max_colors > MAX_PALETTE {
            return Err(Raw2GifError::validation(format!(
                "max_colors must be in 1..={MAX_PALETTE}, got {}",
                self.max_colors
            )));
        }
        self.animation().delay_centis()?;
        Ok(FrameRenderer {
            normalizer: Normalizer::new(self.divisor, self.decades)?,
            colormap: Colormap::named(&self.colormap, self.colormap_levels)?,
            max_colors: self.max_colors,
        })
    }
}

/// Decode → normalize → colorize → quantize for one frame at a time.
#[derive(Clone, Debug)]
pub struct FrameRenderer {
    normalizer: Normalizer,
    colormap: Colormap,
    max_colors: usize,
}

impl FrameRenderer {
    /// Build a renderer from explicit parts.
    pub fn new(normalizer: Normalizer, colormap: Colormap, max_colors: usize) -> Self {
        Self {
            normalizer,
            colormap,
            max_colors,
        }
    }

    /// Colorize a decoded grid.
    pub fn render_grid(&self, grid: &Grid) -> Raw2GifResult<FrameRgb> {
        colorize(&self.normalizer.normalize(grid), &self.colormap)
    }

    /// Decode and colorize a raw frame file.
    pub fn render_file(&self, path: &Path) -> Raw2GifResult<FrameRgb> {
        self.render_grid(&read_raw_frame(path)?)
    }

    /// Decode, colorize and quantize one input. Returns the RGB frame alongside the indexed one.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn render_quantized(&self, path: &Path) -> Raw2GifResult<(FrameRgb, IndexedFrame)> {
        let rgb = self.render_file(path)?;
        let indexed = quantize(&rgb, self.max_colors)?;
        Ok((rgb, indexed))
    }

    /// Render one input into an animation frame, exporting the RGB frame first when asked.
    pub fn render_indexed(
        &self,
        path: &Path,
        export_dir: Option<&Path>,
    ) -> Raw2GifResult<IndexedFrame> {
        let (rgb, indexed) = self.render_quantized(path)?;
        export_frame(export_dir, path, &rgb)?;
        Ok(indexed)
    }
}

fn export_frame(export_dir: Option<&Path>, input: &Path, rgb: &FrameRgb) -> Raw2GifResult<()> {
    match export_dir {
        Some(dir) => save_frame_png(export_path(dir, input), rgb),
        None => Ok(()),
    }
}

/// Summary of a finished conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Frames written to the animation.
    pub frames: usize,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames exported as PNG.
    pub exported: usize,
}

/// Convert every raw frame in `input_dir` matching `opts.pattern` into one GIF at `out_file`.
///
/// Frames are processed in natural file name order. The first failing frame aborts the run.
#[tracing::instrument(skip_all, fields(input = %input_dir.as_ref().display(), out = %out_file.as_ref().display()))]
pub fn convert(
    input_dir: impl AsRef<Path>,
    out_file: impl AsRef<Path>,
    opts: &ConvertOpts,
) -> Raw2GifResult<ConvertStats> {
    let renderer = opts.renderer()?;
    let paths = discover_frames(input_dir, &opts.pattern)?;
    tracing::info!(count = paths.len(), pattern = %opts.pattern, "matched input files");

    let export_dir = opts.export_frames_dir.as_deref();
    if let Some(dir) = export_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create frame export directory '{}'", dir.display()))?;
    }

    let frames = if opts.parallel {
        render_parallel(&renderer, &paths, export_dir, opts.threads)?
    } else {
        render_sequential(&renderer, &paths, export_dir)?
    };

    let first = frames.first().ok_or(Raw2GifError::EmptyInput)?;
    let stats = ConvertStats {
        frames: frames.len(),
        width: first.width,
        height: first.height,
        exported: if export_dir.is_some() { frames.len() } else { 0 },
    };

    let out_file = out_file.as_ref();
    tracing::info!(frames = stats.frames, path = %out_file.display(), "writing animation");
    write_gif(out_file, &frames, &opts.animation())?;
    Ok(stats)
}

/// Render a single raw frame file to a PNG.
#[tracing::instrument(skip_all, fields(input = %input.as_ref().display()))]
pub fn render_raw_to_png(
    input: impl AsRef<Path>,
    out_file: impl AsRef<Path>,
    opts: &ConvertOpts,
) -> Raw2GifResult<FrameRgb> {
    let renderer = opts.renderer()?;
    let frame = renderer.render_file(input.as_ref())?;
    save_frame_png(out_file, &frame)?;
    Ok(frame)
}

fn render_sequential(
    renderer: &FrameRenderer,
    paths: &[PathBuf],
    export_dir: Option<&Path>,
) -> Raw2GifResult<Vec<IndexedFrame>> {
    let mut out = Vec::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        tracing::debug!(index = i, path = %path.display(), "rendering frame");
        out.push(renderer.render_indexed(path, export_dir)?);
    }
    Ok(out)
}

fn render_parallel(
    renderer: &FrameRenderer,
    paths: &[PathBuf],
    export_dir: Option<&Path>,
    threads: Option<usize>,
) -> Raw2GifResult<Vec<IndexedFrame>> {
    let pool = build_thread_pool(threads)?;
    let rendered = pool.install(|| {
        paths
            .par_iter()
            .map(|path| renderer.render_quantized(path))
            .collect::<Vec<_>>()
    });

    // Export in sequencer order and stop at the first failure, same as the sequential path.
    let mut out = Vec::with_capacity(rendered.len());
    for (path, item) in paths.iter().zip(rendered) {
        let (rgb, indexed) = item?;
        export_frame(export_dir, path, &rgb)?;
        out.push(indexed);
    }
    Ok(out)
}

fn build_thread_pool(threads: Option<usize>) -> Raw2GifResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(Raw2GifError::validation(
            "threads must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| Raw2GifError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/convert.rs"]
mod tests;
