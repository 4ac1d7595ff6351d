use crate::foundation::error::{Raw2GifError, Raw2GifResult};
use crate::quantize::median_cut::IndexedFrame;

/// Configuration provided to a [`FrameSink`] before any frame is pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Width shared by every frame, in pixels.
    pub width: u32,
    /// Height shared by every frame, in pixels.
    pub height: u32,
}

impl SinkConfig {
    /// Take the dimensions from a frame.
    pub fn for_frame(frame: &IndexedFrame) -> Self {
        Self {
            width: frame.width,
            height: frame.height,
        }
    }

    /// Reject frames whose size differs from the configured one.
    pub fn check(&self, frame: &IndexedFrame) -> Raw2GifResult<()> {
        if frame.width != self.width || frame.height != self.height {
            return Err(Raw2GifError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Consumer of quantized frames.
///
/// Ordering contract: frames are pushed in sequencer order and a sink must neither reorder nor
/// drop them.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> Raw2GifResult<()>;
    /// Push the next frame.
    fn push_frame(&mut self, frame: &IndexedFrame) -> Raw2GifResult<()>;
    /// Called once after the last frame. Fails with [`Raw2GifError::EmptyInput`] when no frame
    /// was pushed.
    fn end(&mut self) -> Raw2GifResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<IndexedFrame>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[IndexedFrame] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> Raw2GifResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, frame: &IndexedFrame) -> Raw2GifResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| Raw2GifError::validation("in-memory sink not started"))?;
        cfg.check(frame)?;
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> Raw2GifResult<()> {
        if self.frames.is_empty() {
            return Err(Raw2GifError::EmptyInput);
        }
        Ok(())
    }
}

/// Feed `frames` through `sink`: `begin` with the first frame's size, every frame in order, `end`.
pub fn drain_into(sink: &mut dyn FrameSink, frames: &[IndexedFrame]) -> Raw2GifResult<()> {
    let first = frames.first().ok_or(Raw2GifError::EmptyInput)?;
    sink.begin(SinkConfig::for_frame(first))?;
    for frame in frames {
        sink.push_frame(frame)?;
    }
    sink.end()
}
