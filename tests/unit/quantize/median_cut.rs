use std::collections::BTreeSet;

use super::*;

fn frame_from(width: u32, height: u32, pixels: &[[u8; 3]]) -> FrameRgb {
    FrameRgb {
        width,
        height,
        data: pixels.iter().flatten().copied().collect(),
    }
}

/// 32x32 frame with 1024 distinct colors.
fn gradient() -> FrameRgb {
    let mut px = Vec::new();
    for y in 0..32u32 {
        for x in 0..32u32 {
            px.push([(x * 8) as u8, (y * 8) as u8, ((x + y) * 4) as u8]);
        }
    }
    frame_from(32, 32, &px)
}

#[test]
fn few_colors_get_exact_sorted_palette() {
    let f = frame_from(2, 2, &[[9, 9, 9], [1, 2, 3], [9, 9, 9], [0, 0, 255]]);
    let q = quantize(&f, MAX_PALETTE).unwrap();
    assert_eq!(q.palette, vec![[0, 0, 255], [1, 2, 3], [9, 9, 9]]);
    assert_eq!(q.indices, vec![2, 1, 2, 0]);
    assert_eq!(q.to_rgb(), f);
}

#[test]
fn many_colors_are_reduced_to_limit() {
    let f = gradient();
    for limit in [1usize, 2, 16, 256] {
        let q = quantize(&f, limit).unwrap();
        assert!(q.palette.len() <= limit, "limit {limit}");
        assert_eq!(q.indices.len(), 1024);
        assert!(q.indices.iter().all(|&i| (i as usize) < q.palette.len()));
    }
}

#[test]
fn median_cut_uses_full_budget_for_rich_frames() {
    let q = quantize(&gradient(), 64).unwrap();
    assert_eq!(q.palette.len(), 64);
    let used: BTreeSet<u8> = q.indices.iter().copied().collect();
    assert_eq!(used.len(), 64);
}

#[test]
fn quantization_error_is_bounded() {
    let f = gradient();
    let q = quantize(&f, 256).unwrap();
    let approx = q.to_rgb();
    let max_err = f
        .data
        .iter()
        .zip(&approx.data)
        .map(|(a, b)| a.abs_diff(*b))
        .max()
        .unwrap();
    assert!(max_err <= 32, "max channel error {max_err}");
}

#[test]
fn quantize_is_deterministic() {
    let f = gradient();
    assert_eq!(quantize(&f, 100).unwrap(), quantize(&f, 100).unwrap());
}

#[test]
fn single_color_budget_averages_population() {
    let f = frame_from(4, 1, &[[0, 0, 0], [0, 0, 0], [0, 0, 0], [200, 100, 40]]);
    let q = quantize(&f, 1).unwrap();
    assert_eq!(q.palette, vec![[50, 25, 10]]);
    assert_eq!(q.color_at(3, 0), [50, 25, 10]);
}

#[test]
fn invalid_budget_and_short_data_are_rejected() {
    let f = frame_from(1, 1, &[[1, 2, 3]]);
    assert!(matches!(
        quantize(&f, 0).unwrap_err(),
        Raw2GifError::Validation(_)
    ));
    assert!(quantize(&f, 257).is_err());

    let bad = FrameRgb {
        width: 2,
        height: 2,
        data: vec![0; 5],
    };
    assert!(quantize(&bad, 16).is_err());
}
