//! Canvas hot-path benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgb, RgbImage};
use maskcanvas::core::WhiteBalanceConfig;
use maskcanvas::editor::eraser::lines_intersect;
use maskcanvas::mask::{BrushLine, BrushTool, CropReprojection, SubMaskKind, SubMaskParameters};
use maskcanvas::transform::{CropRect, Point, Size};
use maskcanvas::white_balance::{pick_white_balance, WhiteBalance};

fn generate_line(count: usize, tool: BrushTool, y_offset: f64) -> BrushLine {
    BrushLine {
        tool,
        brush_size: 20.0,
        feather: Some(0.5),
        points: (0..count)
            .map(|i| {
                let t = i as f64 / count as f64;
                Point::new(
                    t * 1000.0,
                    (t * std::f64::consts::PI * 4.0).sin() * 100.0 + 500.0 + y_offset,
                )
            })
            .collect(),
    }
}

fn benchmark_line_intersection(c: &mut Criterion) {
    let mut group = c.benchmark_group("Eraser Intersection");

    for count in [10, 50, 100, 500].iter() {
        let painted = generate_line(*count, BrushTool::Brush, 0.0);
        // Far enough apart that every point pair is checked.
        let eraser = generate_line(*count, BrushTool::Eraser, 400.0);

        group.bench_with_input(
            BenchmarkId::new("miss", count),
            &(painted, eraser),
            |b, (painted, eraser)| b.iter(|| lines_intersect(black_box(painted), eraser)),
        );
    }

    group.finish();
}

fn benchmark_white_balance(c: &mut Criterion) {
    let mut group = c.benchmark_group("White Balance Pick");
    let image = RgbImage::from_fn(2048, 1365, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let logical = Size::new(1024.0, 682.5);

    for radius in [2u32, 5, 10].iter() {
        let config = WhiteBalanceConfig {
            sample_radius: *radius,
            ..WhiteBalanceConfig::default()
        };
        group.bench_with_input(BenchmarkId::new("radius", radius), &config, |b, config| {
            b.iter(|| {
                pick_white_balance(
                    &image,
                    black_box(Point::new(512.0, 300.0)),
                    logical,
                    WhiteBalance::default(),
                    config,
                )
            })
        });
    }

    group.finish();
}

fn benchmark_crop_reprojection(c: &mut Criterion) {
    let image = Size::new(6000.0, 4000.0);
    let crop = CropRect::new(1200.0, 800.0, 3000.0, 2000.0);
    let radial = SubMaskParameters::seed(SubMaskKind::Radial, image);

    c.bench_function("reproject radial", |b| {
        b.iter(|| {
            CropReprojection::new(black_box(&crop), image).map(|r| r.apply(&radial))
        })
    });
}

criterion_group!(
    benches,
    benchmark_line_intersection,
    benchmark_white_balance,
    benchmark_crop_reprojection
);
criterion_main!(benches);
