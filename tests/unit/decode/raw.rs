use super::*;

fn raw_bytes(size_x: f32, size_y: f32, body: &[f32]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&size_x.to_le_bytes());
    out.extend_from_slice(&size_y.to_le_bytes());
    for v in body {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

#[test]
fn two_by_two_reshape_transpose_flip() {
    let grid = decode_raw_frame(&raw_bytes(2.0, 2.0, &[1.0, 2.0, 3.0, 4.0])).unwrap();
    assert_eq!(grid.to_rows(), vec![vec![3.0, 4.0], vec![1.0, 2.0]]);
}

#[test]
fn non_square_grid_uses_size_x_as_row_length() {
    // size_x = 3 columns, size_y = 2 rows; first written run is the top row.
    let grid = decode_raw_frame(&raw_bytes(3.0, 2.0, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])).unwrap();
    assert_eq!(grid.width(), 3);
    assert_eq!(grid.height(), 2);
    assert_eq!(
        grid.to_rows(),
        vec![vec![4.0, 5.0, 6.0], vec![1.0, 2.0, 3.0]]
    );
}

#[test]
fn header_sizes_are_truncated() {
    let grid = decode_raw_frame(&raw_bytes(2.9, 1.5, &[7.0, 8.0])).unwrap();
    assert_eq!(grid.width(), 2);
    assert_eq!(grid.height(), 1);
    assert_eq!(grid.to_rows(), vec![vec![7.0, 8.0]]);
}

#[test]
fn short_header_is_format_error() {
    let err = decode_raw_frame(&[0u8; 7]).unwrap_err();
    assert!(matches!(err, Raw2GifError::Format(_)));
    let err = decode_raw_frame(&[]).unwrap_err();
    assert!(matches!(err, Raw2GifError::Format(_)));
}

#[test]
fn short_body_is_format_error() {
    let err = decode_raw_frame(&raw_bytes(2.0, 2.0, &[1.0, 2.0, 3.0])).unwrap_err();
    assert!(matches!(err, Raw2GifError::Format(_)));
}

#[test]
fn partial_trailing_sample_does_not_count() {
    let mut bytes = raw_bytes(2.0, 1.0, &[1.0]);
    bytes.extend_from_slice(&[0, 0, 0]);
    assert!(matches!(
        decode_raw_frame(&bytes).unwrap_err(),
        Raw2GifError::Format(_)
    ));
}

#[test]
fn excess_trailing_data_is_ignored() {
    let mut bytes = raw_bytes(1.0, 2.0, &[1.0, 2.0, 99.0, 100.0]);
    bytes.push(0xAB);
    let grid = decode_raw_frame(&bytes).unwrap();
    assert_eq!(grid.to_rows(), vec![vec![2.0], vec![1.0]]);
}

#[test]
fn zero_or_nan_sizes_are_format_errors() {
    for (x, y) in [(0.0, 2.0), (2.0, 0.5), (-3.0, 2.0), (f32::NAN, 1.0), (1.0, f32::INFINITY)] {
        let err = decode_raw_frame(&raw_bytes(x, y, &[0.0; 4])).unwrap_err();
        assert!(matches!(err, Raw2GifError::Format(_)), "{x}x{y}");
    }
}

#[test]
fn encode_is_inverse_of_decode() {
    let grid = Grid::from_rows(&[
        vec![0.5, -1.0, 2.0],
        vec![3.0, 4.5, 0.0],
        vec![1e-6, 7.0, -8.25],
    ])
    .unwrap();
    let bytes = encode_raw_frame(&grid);
    assert_eq!(bytes.len(), HEADER_LEN + 9 * 4);
    assert_eq!(decode_raw_frame(&bytes).unwrap(), grid);
}

#[test]
fn read_raw_frame_reports_path_on_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sim.0.dat");
    std::fs::write(&path, [1u8, 2, 3]).unwrap();
    let err = read_raw_frame(&path).unwrap_err();
    assert!(matches!(err, Raw2GifError::Format(_)));
    assert!(err.to_string().contains("sim.0.dat"));
}

#[test]
fn read_raw_frame_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_raw_frame(dir.path().join("nope.dat")).unwrap_err();
    assert!(matches!(err, Raw2GifError::Other(_)));
}
