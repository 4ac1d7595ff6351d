use std::io::Cursor;

use image::AnimationDecoder as _;

use super::*;
use crate::decode::raw::write_raw_frame;

fn write_frames(dir: &Path, names_and_values: &[(&str, f32)]) {
    for (name, v) in names_and_values {
        let grid = Grid::new(2, 2, vec![*v; 4]).unwrap();
        write_raw_frame(dir.join(name), &grid).unwrap();
    }
}

fn decode_gif(path: &Path) -> Vec<image::Frame> {
    let bytes = std::fs::read(path).unwrap();
    image::codecs::gif::GifDecoder::new(Cursor::new(bytes))
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap()
}

#[test]
fn defaults_match_documented_values() {
    let o = ConvertOpts::default();
    assert_eq!(o.divisor, 1.0);
    assert_eq!(o.decades, 3.0);
    assert_eq!(o.colormap, "jet");
    assert_eq!(o.colormap_levels, 128);
    assert_eq!(o.frame_duration_secs, 0.1);
    assert_eq!(o.loop_count, 0);
    assert_eq!(o.export_frames_dir, None);
    assert!(o.optimize);
    assert_eq!(o.pattern, "sim.*");
    assert_eq!(o.max_colors, 256);
    assert!(!o.parallel);
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let o = ConvertOpts::from_reader(Cursor::new(r#"{ "decades": 0, "colormap": "hot" }"#))
        .unwrap();
    assert_eq!(o.decades, 0.0);
    assert_eq!(o.colormap, "hot");
    assert_eq!(o.pattern, "sim.*");
}

#[test]
fn json_rejects_unknown_fields() {
    let err = ConvertOpts::from_reader(Cursor::new(r#"{ "decade": 2 }"#)).unwrap_err();
    assert!(matches!(err, Raw2GifError::Validation(_)));
}

#[test]
fn renderer_validates_options() {
    let bad = [
        ConvertOpts {
            divisor: 0.0,
            ..ConvertOpts::default()
        },
        ConvertOpts {
            colormap: "nope".into(),
            ..ConvertOpts::default()
        },
        ConvertOpts {
            max_colors: 300,
            ..ConvertOpts::default()
        },
        ConvertOpts {
            frame_duration_secs: -1.0,
            ..ConvertOpts::default()
        },
    ];
    for o in bad {
        assert!(
            matches!(o.renderer().unwrap_err(), Raw2GifError::Validation(_)),
            "{o:?}"
        );
    }
}

#[test]
fn render_grid_uses_configured_colormap() {
    let opts = ConvertOpts {
        colormap: "gray".into(),
        colormap_levels: 2,
        decades: 0.0,
        ..ConvertOpts::default()
    };
    let renderer = opts.renderer().unwrap();
    let frame = renderer
        .render_grid(&Grid::from_rows(&[vec![0.0, 1.0]]).unwrap())
        .unwrap();
    assert_eq!(frame.pixel(0, 0), [0, 0, 0]);
    assert_eq!(frame.pixel(1, 0), [255, 255, 255]);
}

#[test]
fn convert_writes_frames_in_natural_order() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(
        dir.path(),
        &[("sim.10.dat", 1.0), ("sim.2.dat", 0.01), ("sim.1.dat", 0.001)],
    );
    let out = dir.path().join("out.gif");
    let stats = convert(dir.path(), &out, &ConvertOpts::default()).unwrap();
    assert_eq!(
        stats,
        ConvertStats {
            frames: 3,
            width: 2,
            height: 2,
            exported: 0
        }
    );

    let cmap = Colormap::default();
    let frames = decode_gif(&out);
    assert_eq!(frames.len(), 3);
    let expected = [cmap.colors()[0], cmap.sample(1.0 / 3.0), cmap.colors()[127]];
    for (f, want) in frames.iter().zip(expected) {
        let p = f.buffer().get_pixel(0, 0).0;
        assert_eq!([p[0], p[1], p[2]], want);
    }
}

#[test]
fn parallel_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    let grids = crate::pipeline::synth::gaussian_pulse(12, 7, 6).unwrap();
    crate::pipeline::synth::write_sequence(dir.path(), "sim", &grids).unwrap();

    let seq_out = dir.path().join("seq.gif");
    let par_out = dir.path().join("par.gif");
    convert(dir.path(), &seq_out, &ConvertOpts::default()).unwrap();
    convert(
        dir.path(),
        &par_out,
        &ConvertOpts {
            parallel: true,
            threads: Some(3),
            ..ConvertOpts::default()
        },
    )
    .unwrap();
    assert_eq!(std::fs::read(seq_out).unwrap(), std::fs::read(par_out).unwrap());
}

#[test]
fn malformed_frame_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(dir.path(), &[("sim.0.dat", 1.0), ("sim.2.dat", 1.0)]);
    std::fs::write(dir.path().join("sim.1.dat"), [0u8; 5]).unwrap();
    let out = dir.path().join("out.gif");

    for parallel in [false, true] {
        let opts = ConvertOpts {
            parallel,
            ..ConvertOpts::default()
        };
        let err = convert(dir.path(), &out, &opts).unwrap_err();
        assert!(matches!(err, Raw2GifError::Format(_)), "parallel={parallel}");
        assert!(err.to_string().contains("sim.1.dat"));
    }
    assert!(!out.exists());
}

fn exported_pngs(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn failure_stops_exports_at_the_same_frame_in_both_modes() {
    for bad in ["sim.0.dat", "sim.3.dat"] {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir(&input).unwrap();
        let grids = crate::pipeline::synth::gaussian_pulse(6, 4, 8).unwrap();
        crate::pipeline::synth::write_sequence(&input, "sim", &grids).unwrap();
        std::fs::write(input.join(bad), [0u8; 5]).unwrap();

        let mut left_behind = Vec::new();
        for parallel in [false, true] {
            let export = dir.path().join(format!("png-{parallel}"));
            let opts = ConvertOpts {
                parallel,
                threads: Some(4),
                export_frames_dir: Some(export.clone()),
                ..ConvertOpts::default()
            };
            let err = convert(&input, dir.path().join("out.gif"), &opts).unwrap_err();
            assert!(err.to_string().contains(bad), "parallel={parallel}: {err}");
            left_behind.push(exported_pngs(&export));
        }

        let mut expected: Vec<String> = (0..8)
            .map(|n| format!("sim.{n}.png"))
            .take_while(|name| name.replace(".png", ".dat") != bad)
            .collect();
        expected.sort();
        assert_eq!(left_behind[0], expected, "sequential, bad={bad}");
        assert_eq!(left_behind[1], expected, "parallel, bad={bad}");
    }
}

#[test]
fn mismatched_frame_sizes_fail_at_assembly() {
    let dir = tempfile::tempdir().unwrap();
    write_raw_frame(dir.path().join("sim.0.dat"), &Grid::new(2, 2, vec![1.0; 4]).unwrap())
        .unwrap();
    write_raw_frame(dir.path().join("sim.1.dat"), &Grid::new(3, 2, vec![1.0; 6]).unwrap())
        .unwrap();
    let err = convert(dir.path(), dir.path().join("o.gif"), &ConvertOpts::default()).unwrap_err();
    assert!(matches!(err, Raw2GifError::Validation(_)));
}

#[test]
fn no_matching_files_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(dir.path(), &[("frame.0.dat", 1.0)]);
    let err = convert(dir.path(), dir.path().join("o.gif"), &ConvertOpts::default()).unwrap_err();
    assert!(matches!(err, Raw2GifError::NotFound(_)));
}

#[test]
fn export_dir_receives_one_png_per_frame() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    std::fs::create_dir(&input).unwrap();
    write_frames(&input, &[("sim.0.dat", 1.0), ("sim.1.dat", 0.1)]);
    let export = dir.path().join("frames");
    std::fs::create_dir(&export).unwrap();

    let opts = ConvertOpts {
        export_frames_dir: Some(export.clone()),
        ..ConvertOpts::default()
    };
    let stats = convert(&input, dir.path().join("out").join("a.gif"), &opts).unwrap();
    assert_eq!(stats.exported, 2);
    assert!(export.join("sim.0.png").is_file());
    assert!(export.join("sim.1.png").is_file());
    assert!(dir.path().join("out").join("a.gif").is_file());
}

#[test]
fn render_raw_to_png_writes_single_frame() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("snap.dat");
    write_raw_frame(&input, &Grid::from_rows(&[vec![1.0, 0.001]]).unwrap()).unwrap();
    let out = dir.path().join("snap.png");
    let frame = render_raw_to_png(&input, &out, &ConvertOpts::default()).unwrap();
    assert_eq!((frame.width, frame.height), (2, 1));
    let img = image::open(&out).unwrap().to_rgb8();
    assert_eq!(img.get_pixel(0, 0).0, Colormap::default().colors()[127]);
}
