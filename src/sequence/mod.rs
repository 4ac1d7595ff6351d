//! Input discovery and ordering.

/// Directory + glob discovery of raw frame files.
pub mod discover;
/// Natural (numeric-aware) file name ordering.
pub mod natural;
