use super::*;
use crate::color::colormap::Colormap;
use crate::color::gradient::Gradient;
use crate::extract::frame::MISSING;
use crate::extract::parser::extract;

fn frame(rows: Vec<Vec<f64>>) -> NumericFrame {
    NumericFrame::from_rows(rows).unwrap()
}

fn scales() -> Vec<ColorScale> {
    vec![
        ColorScale::Thermal,
        ColorScale::Grayscale,
        ColorScale::Colormap(Colormap::Plasma),
        ColorScale::Colormap(Colormap::Rainbow),
    ]
}

#[test]
fn worked_example_hits_both_ends_of_the_scale() {
    let f = extract("Image Data\n1.0;2.0;3.0\n4.0;5.0;6.0\n", 3).unwrap();
    let img = Colorizer::default().colorize(&f);
    assert_eq!(img.range(), (1.0, 6.0));
    assert_eq!((img.width(), img.height()), (3, 2));

    let first = img.cell(0, 0).unwrap();
    let last = img.cell(1, 2).unwrap();
    assert_eq!(first.t, Some(0.0));
    assert_eq!(last.t, Some(1.0));

    let thermal = Gradient::thermal();
    assert_eq!(first.rgb, thermal.sample(0.0).to_rgb8());
    assert_eq!(last.rgb, thermal.sample(1.0).to_rgb8());
}

#[test]
fn color_at_range_ends_returns_scale_ends() {
    for scale in scales() {
        let sampler = scale.sampler();
        let c = Colorizer::new(scale);
        assert_eq!(c.color_at(-4.0, -4.0, 12.5), sampler.sample_rgb8(0.0));
        assert_eq!(c.color_at(12.5, -4.0, 12.5), sampler.sample_rgb8(1.0));
    }
}

#[test]
fn color_at_clamps_outside_the_range() {
    let c = Colorizer::new(ColorScale::Grayscale);
    assert_eq!(c.color_at(-100.0, 0.0, 1.0), Rgb8::BLACK);
    assert_eq!(c.color_at(100.0, 0.0, 1.0), Rgb8::new(255, 255, 255));
}

#[test]
fn degenerate_range_maps_to_zero_without_nan() {
    assert_eq!(normalize(5.0, 5.0, 5.0), Some(0.0));
    assert_eq!(normalize(5.0, 6.0, 5.0), Some(0.0));
    assert_eq!(normalize(f64::NAN, 0.0, 1.0), None);

    let img = Colorizer::new(ColorScale::Grayscale).colorize(&frame(vec![vec![7.0; 4]; 3]));
    assert!(img.cells().iter().all(|c| c.t == Some(0.0)));
    assert!(img.cells().iter().all(|c| c.rgb == Rgb8::BLACK));
}

#[test]
fn normalization_is_global_not_per_row() {
    let f = frame(vec![vec![0.0, 1.0], vec![9.0, 10.0]]);
    let img = Colorizer::new(ColorScale::Grayscale).colorize(&f);
    assert_eq!(img.cell(0, 1).unwrap().t, Some(0.1));
    assert_eq!(img.cell(1, 0).unwrap().t, Some(0.9));
}

#[test]
fn scaling_values_does_not_change_the_image() {
    let rows = vec![
        vec![12.0, 17.5, 30.25, 8.0],
        vec![22.0, 19.0, 11.5, 27.75],
        vec![9.5, 14.0, 29.0, 16.0],
    ];
    for scale in scales() {
        let c = Colorizer::new(scale);
        let base = c.colorize(&frame(rows.clone()));
        for k in [2.0, 4.0, 0.5] {
            let scaled: Vec<Vec<f64>> = rows
                .iter()
                .map(|r| r.iter().map(|v| v * k).collect())
                .collect();
            let img = c.colorize(&frame(scaled));
            let a: Vec<Rgb8> = base.cells().iter().map(|c| c.rgb).collect();
            let b: Vec<Rgb8> = img.cells().iter().map(|c| c.rgb).collect();
            assert_eq!(a, b, "scale factor {k}");
        }
    }
}

#[test]
fn colorize_is_deterministic() {
    let f = frame(vec![vec![3.0, 1.0, 2.0], vec![6.0, 5.0, 4.0]]);
    let c = Colorizer::new(ColorScale::Colormap(Colormap::Plasma));
    assert_eq!(c.colorize(&f), c.colorize(&f));
}

#[test]
fn missing_cells_use_missing_color_and_do_not_affect_range() {
    let f = frame(vec![vec![1.0, MISSING], vec![3.0, 5.0]]);
    let c = Colorizer::with_opts(&ColorizeOpts {
        scale: ColorScale::Grayscale,
        missing_rgb: Rgb8::new(1, 2, 3),
        ..Default::default()
    });
    let img = c.colorize(&f);
    assert_eq!(img.range(), (1.0, 5.0));
    let cell = img.cell(0, 1).unwrap();
    assert_eq!(cell.t, None);
    assert_eq!(cell.rgb, Rgb8::new(1, 2, 3));
    assert!(cell.value.is_nan());
}

#[test]
fn boustrophedon_reverses_odd_rows_only() {
    let f = frame(vec![
        vec![1.0, 2.0, 3.0],
        vec![4.0, 5.0, 6.0],
        vec![7.0, 8.0, 9.0],
    ]);
    let c = Colorizer::with_opts(&ColorizeOpts {
        boustrophedon: true,
        ..Default::default()
    });
    let img = c.colorize(&f);
    let values: Vec<Vec<f64>> = img
        .iter_rows()
        .map(|r| r.iter().map(|c| c.value).collect())
        .collect();
    assert_eq!(
        values,
        vec![
            vec![1.0, 2.0, 3.0],
            vec![6.0, 5.0, 4.0],
            vec![7.0, 8.0, 9.0]
        ]
    );

    let plain = Colorizer::default().colorize(&f);
    assert_eq!(plain.cell(1, 0).unwrap().value, 4.0);
}

#[test]
fn cell_lookup_out_of_range_is_none() {
    let img = Colorizer::default().colorize(&frame(vec![vec![1.0, 2.0], vec![3.0, 4.0]]));
    assert!(img.cell(1, 1).is_some());
    assert_eq!(img.cell(2, 0), None);
    assert_eq!(img.cell(0, 2), None);
    assert_eq!(img.cell(usize::MAX / 2, 0), None);
    assert_eq!(img.cell(usize::MAX, 1), None);
}
