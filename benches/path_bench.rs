//! Benchmarks for chart path generation and rendering
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use dstat::chart::{render_svg, AxisLabels, ChartFrame, ChartStyle, Interpolation, PathBuilder};
use dstat::model::{DataPoint, Series};

fn create_test_series(count: usize) -> Series {
    (0..count)
        .map(|i| {
            let value = 100.0 + 40.0 * (i as f64 / 10.0).sin();
            DataPoint::labelled(value, format!("{:02}:{:02}", i / 60, i % 60))
        })
        .collect()
}

fn bench_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("paths");

    for size in [30, 300, 3000] {
        let series = create_test_series(size);
        group.throughput(Throughput::Elements(size as u64));

        for interpolation in [Interpolation::Linear, Interpolation::Smooth] {
            let builder = PathBuilder::new(interpolation);
            group.bench_function(format!("{:?}_{}", interpolation, size).to_lowercase(), |b| {
                b.iter(|| builder.build(black_box(&series)))
            });
        }
    }

    group.finish();
}

fn bench_svg(c: &mut Criterion) {
    let series = create_test_series(300);
    let frame = ChartFrame {
        paths: PathBuilder::new(Interpolation::Smooth).build(&series),
        x_labels: AxisLabels::x_axis(&series),
        y_labels: AxisLabels::y_axis(&series),
        point_count: series.len(),
        transitioning: false,
    };
    let style = ChartStyle::default();

    c.bench_function("render_svg_300", |b| {
        b.iter(|| render_svg(black_box(&frame), &style))
    });
}

criterion_group!(benches, bench_paths, bench_svg);
criterion_main!(benches);
