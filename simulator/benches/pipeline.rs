use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shared::units::{Temperature, TemperatureExt};
use simulator::photometry::atmosphere::AbsorptionModel;
use simulator::photometry::filters::{apply_filters, FilterSpec};
use simulator::photometry::photoconversion::to_photon_counts;
use simulator::photometry::spectrum::make_grid;
use simulator::photometry::stellar::source_spectrum;
use simulator::sims::{run_batch, run_simulation, SimulationParameters};

fn make_parameters(temperature_k: f64) -> SimulationParameters {
    SimulationParameters::new(
        Temperature::from_kelvin(temperature_k),
        1e6,
        AbsorptionModel::RayleighOzone,
        vec![
            FilterSpec::new(685.0, 65.0).unwrap(),
            FilterSpec::new(450.0, 5.0).unwrap(),
        ],
    )
    .unwrap()
}

fn bench_stages(c: &mut Criterion) {
    let grid = make_grid(300.0, 1100.0, 100_000).unwrap();
    let source = source_spectrum(&grid, 5780.0).unwrap();
    let filters = [FilterSpec::new(685.0, 65.0).unwrap()];

    let mut group = c.benchmark_group("stages_100k");
    group.bench_function("source_spectrum", |b| {
        b.iter(|| source_spectrum(black_box(&grid), black_box(5780.0)))
    });
    group.bench_function("apply_filters", |b| {
        b.iter(|| apply_filters(black_box(&source), black_box(&grid), black_box(&filters)))
    });
    group.bench_function("to_photon_counts", |b| {
        b.iter(|| to_photon_counts(black_box(&source), black_box(&grid), black_box(1e6)))
    });
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let small = make_grid(400.0, 800.0, 100).unwrap();
    let large = make_grid(300.0, 1100.0, 100_000).unwrap();
    let params = make_parameters(5780.0);

    let mut group = c.benchmark_group("run_simulation");
    group.bench_function("100_samples", |b| {
        b.iter(|| run_simulation(black_box(&small), black_box(&params)))
    });
    group.bench_function("100k_samples", |b| {
        b.iter(|| run_simulation(black_box(&large), black_box(&params)))
    });
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let grid = make_grid(300.0, 1100.0, 10_000).unwrap();
    let runs: Vec<SimulationParameters> = (0..64)
        .map(|i| make_parameters(3000.0 + 150.0 * i as f64))
        .collect();

    c.bench_function("run_batch_64x10k", |b| {
        b.iter(|| run_batch(black_box(&grid), black_box(&runs)))
    });
}

criterion_group!(benches, bench_stages, bench_pipeline, bench_batch);
criterion_main!(benches);
