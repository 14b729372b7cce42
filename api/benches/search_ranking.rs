use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::Rng;

use terra_api::search::ranking::rank;

const DIMS: usize = 1536;

fn random_vector(rng: &mut impl Rng, dims: usize) -> Vec<f32> {
    (0..dims).map(|_| rng.random_range(-1.0f32..1.0)).collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_ranking");
    let mut rng = rand::rng();
    let query = random_vector(&mut rng, DIMS);

    for n in [100usize, 1_000, 10_000] {
        let candidates: Vec<Vec<f32>> = (0..n).map(|_| random_vector(&mut rng, DIMS)).collect();
        group.bench_function(BenchmarkId::new("linear_scan", n), |b| {
            b.iter(|| rank(&query, &candidates, 0.75, 10))
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
