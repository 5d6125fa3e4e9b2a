// End-to-end EQ benchmarks
//
// Run with: cargo bench --bench eq_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use crossbeam::channel::bounded;
use virelai_benchmarks::{configured_chain, generate_test_buffer, working_settings};
use virelai_core::domain::params::Slope;
use virelai_core::domain::updater::render_update;
use virelai_infra::audio::EqProcessor;

const SAMPLE_RATE: f64 = 48000.0;

fn bench_stereo_block_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("stereo_block");

    for frames in [64, 256, 1024, 2048].iter() {
        let (sender, receiver) = bounded(4);
        let mut processor = EqProcessor::new(receiver);
        sender
            .send(render_update(&working_settings(), SAMPLE_RATE).unwrap())
            .unwrap();
        let mut buffer = generate_test_buffer(48000, *frames);
        // First block consumes the update
        processor.process_interleaved(&mut buffer, 2);

        group.throughput(Throughput::Elements(*frames as u64));
        group.bench_with_input(BenchmarkId::new("frames", frames), frames, |b, _| {
            b.iter(|| {
                processor.process_interleaved(black_box(&mut buffer), 2);
            });
        });
    }

    group.finish();
}

fn bench_update_render_per_slope(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_update");

    for slope in [Slope::Db12, Slope::Db24, Slope::Db36, Slope::Db48].iter() {
        let mut settings = working_settings();
        settings.high_pass.slope = *slope;
        settings.low_pass.slope = *slope;

        group.bench_with_input(
            BenchmarkId::from_parameter(slope.db_per_octave()),
            slope,
            |b, _| {
                b.iter(|| black_box(render_update(black_box(&settings), SAMPLE_RATE)).ok());
            },
        );
    }

    group.finish();
}

fn bench_block_with_update_applied(c: &mut Criterion) {
    // Worst case for a block: an update waiting at the block boundary
    let update = render_update(&working_settings(), SAMPLE_RATE).unwrap();
    let (sender, receiver) = bounded(16);
    let mut processor = EqProcessor::new(receiver);
    let mut buffer = generate_test_buffer(48000, 512);

    c.bench_function("block_512_with_pending_update", |b| {
        b.iter(|| {
            sender.try_send(update).ok();
            processor.process_interleaved(black_box(&mut buffer), 2);
        });
    });
}

fn bench_response_curve(c: &mut Criterion) {
    let chain = configured_chain(SAMPLE_RATE);

    c.bench_function("response_curve_80_columns", |b| {
        b.iter(|| {
            black_box(virelai_core::domain::magnitude_curve_db(
                black_box(&chain),
                SAMPLE_RATE,
                80,
            ));
        });
    });
}

criterion_group!(
    benches,
    bench_stereo_block_processing,
    bench_update_render_per_slope,
    bench_block_with_update_applied,
    bench_response_curve
);

criterion_main!(benches);
