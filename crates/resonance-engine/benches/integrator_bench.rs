//! Integrator and metrics-refresh benchmark suite
//!
//! Run: cargo bench -p resonance-engine --bench integrator_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use resonance_core::{build_network, refresh_metrics, seeded_rng, EngineConfig, Network};
use resonance_engine::{EmergenceDetector, OscillatorIntegrator};

// =============================================================================
// Helper Functions
// =============================================================================

fn network_of(size: usize) -> (EngineConfig, Network) {
    let mut config = EngineConfig::default();
    config.network.size = size;
    config.network.density = 0.3;
    let network = build_network(&config, &mut seeded_rng(size as u64)).expect("build");
    (config, network)
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_integrator_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrator_step");
    for size in [10usize, 100, 500] {
        let (config, mut network) = network_of(size);
        let integrator = OscillatorIntegrator::new(config.integrator).expect("integrator");
        let mut rng = seeded_rng(7);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| integrator.step(black_box(&mut network), 0.01, &mut rng))
        });
    }
    group.finish();
}

fn bench_refresh_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("refresh_metrics");
    for size in [10usize, 100, 500] {
        let (_, mut network) = network_of(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| refresh_metrics(black_box(&mut network)))
        });
    }
    group.finish();
}

fn bench_detect_emergence(c: &mut Criterion) {
    let (config, network) = network_of(100);
    let mut detector = EmergenceDetector::new(config.detector).expect("detector");
    c.bench_function("detect_emergence_100_fields", |b| {
        b.iter(|| detector.detect_emergence(black_box(&network)))
    });
}

criterion_group!(
    benches,
    bench_integrator_step,
    bench_refresh_metrics,
    bench_detect_emergence
);
criterion_main!(benches);
