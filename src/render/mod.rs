/// Normalized field to RGB raster.
pub mod colorize;
