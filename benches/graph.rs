use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use thyrosim_client::prelude::graph::{axis_ceiling, range_overlay, Series, TickFormat};
use thyrosim_client::prelude::*;

struct NullRenderer;

impl ChartRenderer for NullRenderer {
    fn init(&mut self, _frame: &ChartFrame) {}
    fn update(&mut self, _frame: &ChartFrame) {}
    fn set_range_visible(&mut self, _visible: bool) {}
}

/// A run sampled every 6 minutes over `days` days
fn sampled_run(days: f64, peak: f64) -> RunPayload {
    let n = (days * 240.0) as usize;
    let times: Vec<f64> = (0..n).map(|i| i as f64 * 0.1).collect();
    Quantity::ALL.into_iter().fold(
        RunPayload::new(days, times.clone()),
        |payload, quantity| {
            let values: Vec<f64> = times
                .iter()
                .map(|t| peak * (1.0 + 0.2 * (t / 24.0).sin()))
                .collect();
            let max = values.iter().copied().fold(0.0, f64::max);
            payload.with_series(quantity, Series::new(values, max))
        },
    )
}

fn bench_scaling(c: &mut Criterion) {
    let observed: Vec<f64> = (0..1000).map(|i| i as f64 * 1.37).collect();

    c.bench_function("axis_ceiling_1000", |b| {
        b.iter(|| {
            for v in &observed {
                black_box(axis_ceiling(black_box(*v)));
            }
        });
    });

    c.bench_function("range_overlay_and_ticks", |b| {
        b.iter(|| {
            let ceiling = axis_ceiling(black_box(1234.5));
            let overlay = range_overlay(ceiling, 105.0, 45.0);
            let ticks = TickFormat::for_ceiling(ceiling);
            black_box((overlay, ticks.format(ceiling)));
        });
    });
}

fn bench_chart_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart_frames");
    for days in [5.0, 30.0, 100.0] {
        let mut store = RunStore::new(Variant::Standard);
        store.set_run(RunSlot::Primary, Some(sampled_run(days, 20.0)));
        store.set_run(RunSlot::Secondary, Some(sampled_run(days / 2.0, 25.0)));
        let mut charts = ChartController::new(NullRenderer);
        charts.render_all(&store);

        group.bench_with_input(BenchmarkId::from_parameter(days), &store, |b, store| {
            b.iter(|| charts.render_all(black_box(store)));
        });
    }
    group.finish();
}

fn bench_renumbering(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_remove_first");
    for n in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut registry = DosingRegistry::new();
                for _ in 0..n {
                    registry.add(Route::Oral, Hormone::T4);
                }
                while !registry.is_empty() {
                    registry.remove(1).ok();
                }
                black_box(registry.rows());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scaling, bench_chart_frames, bench_renumbering);
criterion_main!(benches);
