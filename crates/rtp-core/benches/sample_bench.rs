use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rtp_core::{CalibratedState, Calibrator};

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample");

    for n in [1_000, 10_000, 1_000_000] {
        let state = CalibratedState::initialize(0.5, n).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        group.bench_with_input(BenchmarkId::new("partition", n), &state, |b, state| {
            b.iter(|| black_box(state.sample(&mut rng)))
        });
    }

    group.finish();
}

fn bench_calibrate(c: &mut Criterion) {
    let mut group = c.benchmark_group("calibrate");
    group.sample_size(20);

    let calibrator = Calibrator::default();
    for n in [1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("partition", n), &n, |b, &n| {
            b.iter(|| black_box(calibrator.solve(black_box(0.7), n)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sample, bench_calibrate);
criterion_main!(benches);
