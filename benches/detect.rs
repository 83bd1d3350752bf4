use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use detect_primes::detect_primes;

/// Candidates with wide divisor ranges, where splitting a scan pays off
fn large_candidates() -> Vec<i64> {
    vec![
        1_000_000_000_000_037,
        999_999_999_999_989,
        10_000_019 * 10_000_079,
        1_000_000_000_000_003,
    ]
}

/// Many small candidates, mostly settled by the trivial filter
fn small_candidates() -> Vec<i64> {
    (1..20_000).collect()
}

fn bench_thread_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_primes");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    for (label, nums) in [("large", large_candidates()), ("small", small_candidates())] {
        for threads in [1usize, 2, 4, 8] {
            group.bench_with_input(BenchmarkId::new(label, threads), &threads, |b, &threads| {
                b.iter(|| detect_primes(black_box(&nums), threads).unwrap())
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_thread_counts);
criterion_main!(benches);
