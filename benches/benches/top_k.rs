use std::sync::OnceLock;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use seqstore::{BoundedSortedSeq, SizeLimit, order};
use seqtools::Pipeline;

const NUM_INTS: usize = 100_000;

fn vals() -> &'static [u64] {
    static VALS: OnceLock<Vec<u64>> = OnceLock::new();
    VALS.get_or_init(|| {
        let mut rng = <rand::rngs::SmallRng as rand::SeedableRng>::seed_from_u64(5938450);
        (0..NUM_INTS)
            .map(|_| rand::Rng::gen_range(&mut rng, 0..1_000_000))
            .collect()
    })
}

fn benchmark_top_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_k");
    let source = Pipeline::from_slice(vals());
    for k in [1, 10, 1_000] {
        group.bench_with_input(BenchmarkId::new("sort_take", k), &k, |b, &k| {
            let least = source.sort().unwrap().take(k);
            b.iter(|| black_box(least.to_vec().unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("full_sort_then_truncate", k), &k, |b, &k| {
            b.iter(|| {
                let mut all = vals().to_vec();
                all.sort();
                all.truncate(k);
                black_box(all)
            });
        });

        group.bench_with_input(BenchmarkId::new("bounded_sorted_seq", k), &k, |b, &k| {
            b.iter(|| {
                let mut seq = BoundedSortedSeq::with_limit(order::natural(), SizeLimit::least(k));
                seq.push_many(vals().iter().copied());
                black_box(seq.into_vec())
            });
        });
    }
    group.finish();
}

criterion_group!(top_k, benchmark_top_k);
criterion_main!(top_k);
