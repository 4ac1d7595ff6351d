//! Output encoders.
//!
//! Sinks consume quantized frames in sequencer order; the GIF sink assembles them into one
//! animation. PNG export is a side channel for the unquantized frames.

/// Animated GIF assembly.
pub mod gif;
/// Single-frame PNG export.
pub mod png;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
