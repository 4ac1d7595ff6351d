use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig, drain_into};
use crate::foundation::error::{Raw2GifError, Raw2GifResult};
use crate::quantize::median_cut::{IndexedFrame, MAX_PALETTE};

/// Timing and encoding options for an animation.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationOpts {
    /// Seconds each frame stays on screen. Stored with centisecond resolution.
    pub frame_duration_secs: f64,
    /// Number of loops; `0` loops forever.
    pub loop_count: u16,
    /// Share one palette when possible and only re-encode the changed region of each frame.
    pub optimize: bool,
}

impl Default for AnimationOpts {
    fn default() -> Self {
        Self {
            frame_duration_secs: 0.1,
            loop_count: 0,
            optimize: true,
        }
    }
}

impl AnimationOpts {
    /// Per-frame delay in GIF centiseconds.
    ///
    /// The duration is truncated to whole milliseconds and then to whole centiseconds, so
    /// `0.019` s becomes 1 cs.
    pub fn delay_centis(&self) -> Raw2GifResult<u16> {
        let secs = self.frame_duration_secs;
        if !secs.is_finite() || secs < 0.0 {
            return Err(Raw2GifError::validation(format!(
                "frame duration must be finite and >= 0, got {secs}"
            )));
        }
        let millis = (secs * 1000.0).trunc();
        let centis = (millis / 10.0).trunc();
        if centis > f64::from(u16::MAX) {
            return Err(Raw2GifError::validation(format!(
                "frame duration {secs}s exceeds the GIF maximum of 655.35s"
            )));
        }
        Ok(centis as u16)
    }

    fn repeat(&self) -> gif::Repeat {
        match self.loop_count {
            0 => gif::Repeat::Infinite,
            n => gif::Repeat::Finite(n),
        }
    }
}

/// Sink that assembles pushed frames into one animated GIF written to `W`.
pub struct GifSink<W: Write> {
    opts: AnimationOpts,
    writer: Option<W>,
    encoder: Option<gif::Encoder<W>>,
    finished: Option<W>,

    cfg: Option<SinkConfig>,
    delay: u16,
    global_palette: Option<Vec<[u8; 3]>>,
    // Colors currently on the GIF canvas; only tracked when optimizing.
    canvas: Vec<[u8; 3]>,
    frames_written: usize,
}

impl<W: Write> GifSink<W> {
    /// Create a sink that will write into `writer`.
    pub fn new(writer: W, opts: AnimationOpts) -> Self {
        Self {
            opts,
            writer: Some(writer),
            encoder: None,
            finished: None,
            cfg: None,
            delay: 0,
            global_palette: None,
            canvas: Vec::new(),
            frames_written: 0,
        }
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Return the underlying writer once [`FrameSink::end`] has succeeded.
    pub fn into_inner(self) -> Option<W> {
        self.finished
    }

    fn start_encoder(&mut self, cfg: SinkConfig, first: &IndexedFrame) -> Raw2GifResult<()> {
        let writer = self
            .writer
            .take()
            .ok_or_else(|| Raw2GifError::encode("gif sink writer already consumed"))?;

        let global = if self.opts.optimize {
            first.palette.clone()
        } else {
            Vec::new()
        };
        let mut encoder =
            gif::Encoder::new(writer, cfg.width as u16, cfg.height as u16, &flatten(&global))
                .map_err(|e| Raw2GifError::encode(format!("write gif header: {e}")))?;
        encoder
            .set_repeat(self.opts.repeat())
            .map_err(|e| Raw2GifError::encode(format!("write gif loop extension: {e}")))?;

        if self.opts.optimize {
            self.global_palette = Some(global);
        }
        self.encoder = Some(encoder);
        Ok(())
    }

    fn encode_full(&self, frame: &IndexedFrame) -> gif::Frame<'static> {
        let palette = if self.opts.optimize {
            self.local_palette(frame)
        } else {
            let mut padded = frame.palette.clone();
            padded.resize(MAX_PALETTE, [0, 0, 0]);
            Some(flatten(&padded))
        };
        gif::Frame {
            delay: self.delay,
            dispose: gif::DisposalMethod::Keep,
            width: frame.width as u16,
            height: frame.height as u16,
            palette,
            buffer: Cow::Owned(frame.indices.clone()),
            ..gif::Frame::default()
        }
    }

    fn encode_delta(&self, frame: &IndexedFrame) -> gif::Frame<'static> {
        let width = frame.width as usize;
        let (x0, y0, x1, y1) = changed_bounds(&self.canvas, frame).unwrap_or((0, 0, 0, 0));
        let mut buffer = Vec::with_capacity((x1 - x0 + 1) * (y1 - y0 + 1));
        for y in y0..=y1 {
            buffer.extend_from_slice(&frame.indices[y * width + x0..=y * width + x1]);
        }
        gif::Frame {
            delay: self.delay,
            dispose: gif::DisposalMethod::Keep,
            left: x0 as u16,
            top: y0 as u16,
            width: (x1 - x0 + 1) as u16,
            height: (y1 - y0 + 1) as u16,
            palette: self.local_palette(frame),
            buffer: Cow::Owned(buffer),
            ..gif::Frame::default()
        }
    }

    fn local_palette(&self, frame: &IndexedFrame) -> Option<Vec<u8>> {
        match &self.global_palette {
            Some(global) if *global == frame.palette => None,
            _ => Some(flatten(&frame.palette)),
        }
    }
}

impl<W: Write> FrameSink for GifSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> Raw2GifResult<()> {
        if self.cfg.is_some() {
            return Err(Raw2GifError::encode("gif sink already started"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(Raw2GifError::validation(
                "gif width/height must be non-zero",
            ));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(Raw2GifError::validation(format!(
                "gif dimensions are limited to 65535, got {}x{}",
                cfg.width, cfg.height
            )));
        }
        self.delay = self.opts.delay_centis()?;
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, frame: &IndexedFrame) -> Raw2GifResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| Raw2GifError::encode("gif sink not started"))?;
        cfg.check(frame)?;
        if frame.palette.is_empty() || frame.palette.len() > MAX_PALETTE {
            return Err(Raw2GifError::validation(format!(
                "frame palette must hold 1..={MAX_PALETTE} colors, got {}",
                frame.palette.len()
            )));
        }
        let pixel_count = cfg.width as usize * cfg.height as usize;
        if frame.indices.len() != pixel_count {
            return Err(Raw2GifError::validation(format!(
                "frame has {} indices, expected {pixel_count}",
                frame.indices.len()
            )));
        }
        if frame
            .indices
            .iter()
            .any(|&i| i as usize >= frame.palette.len())
        {
            return Err(Raw2GifError::validation(
                "frame index points past the end of its palette",
            ));
        }

        if self.encoder.is_none() {
            self.start_encoder(cfg, frame)?;
        }

        let encoded = if self.opts.optimize && self.frames_written > 0 {
            self.encode_delta(frame)
        } else {
            self.encode_full(frame)
        };

        let n = self.frames_written;
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| Raw2GifError::encode("gif sink is already finalized"))?;
        encoder
            .write_frame(&encoded)
            .map_err(|e| Raw2GifError::encode(format!("write gif frame {n}: {e}")))?;

        if self.opts.optimize {
            self.canvas = resolve(frame);
        }
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> Raw2GifResult<()> {
        if self.frames_written == 0 {
            return Err(Raw2GifError::EmptyInput);
        }
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| Raw2GifError::encode("gif sink is already finalized"))?;
        let writer = encoder
            .into_inner()
            .map_err(|e| Raw2GifError::encode(format!("finish gif stream: {e}")))?;
        self.finished = Some(writer);
        self.cfg = None;
        Ok(())
    }
}

/// Encode `frames` as one animated GIF into `writer` and hand the writer back.
pub fn assemble_gif<W: Write>(
    frames: &[IndexedFrame],
    opts: &AnimationOpts,
    writer: W,
) -> Raw2GifResult<W> {
    let mut sink = GifSink::new(writer, opts.clone());
    drain_into(&mut sink, frames)?;
    sink.into_inner()
        .ok_or_else(|| Raw2GifError::encode("gif sink finished without output"))
}

/// Encode `frames` as one animated GIF held in memory.
pub fn encode_gif(frames: &[IndexedFrame], opts: &AnimationOpts) -> Raw2GifResult<Vec<u8>> {
    assemble_gif(frames, opts, Vec::new())
}

/// Encode `frames` as one animated GIF at `path`, creating the parent directory if needed.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display(), frames = frames.len()))]
pub fn write_gif(
    path: impl AsRef<Path>,
    frames: &[IndexedFrame],
    opts: &AnimationOpts,
) -> Raw2GifResult<()> {
    let path = path.as_ref();
    if frames.is_empty() {
        return Err(Raw2GifError::EmptyInput);
    }
    ensure_parent_dir(path)?;
    let file =
        File::create(path).with_context(|| format!("create gif '{}'", path.display()))?;

    let mut writer = assemble_gif(frames, opts, BufWriter::new(file))?;
    writer
        .flush()
        .with_context(|| format!("flush gif '{}'", path.display()))?;
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> Raw2GifResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn flatten(palette: &[[u8; 3]]) -> Vec<u8> {
    palette.iter().flatten().copied().collect()
}

fn resolve(frame: &IndexedFrame) -> Vec<[u8; 3]> {
    frame
        .indices
        .iter()
        .map(|&i| frame.palette[i as usize])
        .collect()
}

/// Inclusive `(x0, y0, x1, y1)` box around the pixels whose color differs from `canvas`.
fn changed_bounds(canvas: &[[u8; 3]], frame: &IndexedFrame) -> Option<(usize, usize, usize, usize)> {
    let width = frame.width as usize;
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for (i, (&idx, prev)) in frame.indices.iter().zip(canvas).enumerate() {
        if frame.palette[idx as usize] == *prev {
            continue;
        }
        let (x, y) = (i % width, i / width);
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
