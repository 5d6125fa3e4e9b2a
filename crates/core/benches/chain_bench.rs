// Performance benchmarks for filter design and chain processing
//
// Run with: cargo bench --bench chain_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use virelai_core::domain::chain::StageChain;
use virelai_core::domain::filter::{design_shelving_cascade, BiquadCoeffs, FilterKind};
use virelai_core::domain::params::{ChainSettings, Slope};
use virelai_core::domain::response::magnitude_curve_db;
use virelai_core::domain::updater::render_update;

const SAMPLE_RATE: f64 = 48000.0;

fn full_chain() -> StageChain {
    let mut settings = ChainSettings::default();
    settings.high_pass.cutoff_hz = 100.0;
    settings.high_pass.slope = Slope::Db48;
    settings.low_pass.cutoff_hz = 12_000.0;
    settings.low_pass.slope = Slope::Db48;
    settings.low_peak.gain_db = 3.0;
    settings.mid_peak.gain_db = -2.0;
    settings.high_peak.gain_db = 4.0;

    let mut chain = StageChain::new();
    render_update(&settings, SAMPLE_RATE)
        .unwrap()
        .apply_to(&mut chain);
    chain
}

fn bench_cascade_design(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade_design");

    for slope in [Slope::Db12, Slope::Db24, Slope::Db36, Slope::Db48].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(slope.db_per_octave()),
            slope,
            |b, &slope| {
                b.iter(|| {
                    black_box(design_shelving_cascade(
                        black_box(100.0),
                        SAMPLE_RATE,
                        slope,
                        FilterKind::HighPass,
                    ))
                });
            },
        );
    }

    group.finish();
}

fn bench_peaking_design(c: &mut Criterion) {
    c.bench_function("peaking_design", |b| {
        b.iter(|| {
            black_box(BiquadCoeffs::peaking(
                SAMPLE_RATE,
                black_box(1000.0),
                1.0,
                2.0,
            ))
        });
    });
}

fn bench_render_update(c: &mut Criterion) {
    let settings = ChainSettings::default();

    c.bench_function("render_full_update", |b| {
        b.iter(|| {
            black_box(render_update(black_box(&settings), SAMPLE_RATE)).ok();
        });
    });
}

fn bench_chain_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_process");

    for block_size in [64, 256, 1024, 2048].iter() {
        let mut chain = full_chain();
        let mut buffer: Vec<f32> = (0..*block_size)
            .map(|i| (i as f32 * 0.05).sin() * 0.5)
            .collect();

        group.bench_with_input(
            BenchmarkId::new("samples", block_size),
            block_size,
            |b, _| {
                b.iter(|| {
                    chain.process(black_box(&mut buffer));
                });
            },
        );
    }

    group.finish();
}

fn bench_magnitude_curve(c: &mut Criterion) {
    let chain = full_chain();
    let mut group = c.benchmark_group("magnitude_curve");

    for width in [80, 256, 1024].iter() {
        group.bench_with_input(BenchmarkId::new("columns", width), width, |b, &width| {
            b.iter(|| {
                black_box(magnitude_curve_db(black_box(&chain), SAMPLE_RATE, width));
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_cascade_design,
    bench_peaking_design,
    bench_render_update,
    bench_chain_process,
    bench_magnitude_curve
);

criterion_main!(benches);
