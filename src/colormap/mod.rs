/// Discrete N-level colormap lookup tables.
pub mod lut;
