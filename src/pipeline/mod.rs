/// Options and the end-to-end raw frames to GIF conversion.
pub mod convert;
/// Synthetic snapshot sequences for demos and smoke tests.
pub mod synth;
