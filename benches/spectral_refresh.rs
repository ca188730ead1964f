//! Benchmarks for the refresh path
//!
//! Run with: cargo bench

use std::f64::consts::TAU;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dashvis_rs::analysis::SpectralAnalyzer;
use dashvis_rs::store::SampleRing;
use dashvis_rs::types::{DatasetWidget, GroupWidget};
use dashvis_rs::{Dashboard, DashboardConfig, Dataset, Frame, GlobalIndex, Group};

fn sine_ring(size: usize) -> SampleRing {
    let mut ring = SampleRing::new(size);
    for n in 0..size {
        ring.push((TAU * 5.0 * n as f64 / size as f64).sin());
    }
    ring
}

fn bench_spectral_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("spectral_refresh");

    for size in [64usize, 256, 1024, 4096] {
        let ring = sine_ring(size);
        let mut analyzer = SpectralAnalyzer::new();
        analyzer.configure(size, 1000.0);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ring, |b, ring| {
            b.iter(|| black_box(analyzer.refresh(black_box(ring)).map(|f| f.len())))
        });
    }

    group.finish();
}

fn rig_frame(v: f64, groups: usize) -> Frame {
    (0..groups).fold(Frame::new("Bench"), |frame, g| {
        frame.with_group(
            Group::new(format!("Group {}", g), GroupWidget::DataGrid)
                .with_dataset(Dataset::new("A", v).with_widget(DatasetWidget::Bar).with_graph())
                .with_dataset(Dataset::new("B", -v).with_widget(DatasetWidget::Gauge))
                .with_dataset(Dataset::new("C", v * 2.0).with_fft(256, 1000.0)),
        )
    })
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");

    for groups in [1usize, 8, 32] {
        let mut dashboard = Dashboard::new(&DashboardConfig::default());
        dashboard.ingest(rig_frame(0.0, groups));
        for i in 0..dashboard.total_widget_count() {
            let host = dashboard.add_host();
            dashboard.set_global_index(host, GlobalIndex(i));
        }

        let mut v = 0.0;
        group.bench_function(BenchmarkId::from_parameter(groups), |b| {
            b.iter(|| {
                v += 1.0;
                black_box(dashboard.ingest(rig_frame(v, groups)))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_spectral_refresh, bench_ingest);
criterion_main!(benches);
