use criterion::{Criterion, black_box, criterion_group, criterion_main};
use seqtools::{Flags, Pipeline, range};

const NUM_INTS: u64 = 100_000;
const FINAL: usize = 100;

fn benchmark_take_final(c: &mut Criterion) {
    let known = range(0, NUM_INTS);
    c.bench_function("take_final/known_size", |b| {
        let last = known.take_final(FINAL).unwrap();
        b.iter(|| black_box(last.to_vec().unwrap()));
    });

    let unknown = range(0, NUM_INTS).filter(|_| true);
    c.bench_function("take_final/ring_buffer", |b| {
        let last = unknown.take_final(FINAL).unwrap();
        b.iter(|| black_box(last.to_vec().unwrap()));
    });

    c.bench_function("take_final/collect_then_drain", |b| {
        b.iter(|| {
            let mut all = unknown.to_vec().unwrap();
            all.drain(..all.len() - FINAL);
            black_box(all)
        });
    });
}

fn benchmark_fresh_take(c: &mut Criterion) {
    let fresh = Pipeline::from_fn_with(|| (0..NUM_INTS).collect::<Vec<_>>(), Flags::MATERIALIZED);
    c.bench_function("take/fresh_in_place", |b| {
        let head = fresh.take(FINAL);
        b.iter(|| black_box(head.to_vec().unwrap()));
    });

    let lazy = Pipeline::from_fn(|| (0..NUM_INTS).collect::<Vec<_>>());
    c.bench_function("take/lazy_cursor", |b| {
        let head = lazy.take(FINAL);
        b.iter(|| black_box(head.to_vec().unwrap()));
    });
}

fn benchmark_windows(c: &mut Criterion) {
    let source = range(0, NUM_INTS);
    c.bench_function("windows/ring_buffer", |b| {
        let sums = source.windows(8).unwrap().map(|w| w.iter().sum::<u64>());
        b.iter(|| black_box(sums.fold(0, u64::wrapping_add).unwrap()));
    });
}

criterion_group!(
    final_slices,
    benchmark_take_final,
    benchmark_fresh_take,
    benchmark_windows,
);
criterion_main!(final_slices);
