/// Median-cut palette reduction.
pub mod median_cut;
