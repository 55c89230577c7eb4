use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use palette_kmeans::cluster::{fit, Dataset, Euclidean, KMeansConfig};
use palette_kmeans::palette::pixel_record;
use palette_kmeans::FeatureSchema;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn random_pixels(n: usize, seed: u64) -> Dataset {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let records = (0..n)
        .map(|_| pixel_record(rng.gen::<u32>() & 0xFFFFFF))
        .collect();
    Dataset::new(FeatureSchema::rgb(), records).unwrap()
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_fit");
    let data = random_pixels(10_000, 42);

    for k in [4, 16, 64] {
        group.bench_with_input(BenchmarkId::new("sequential", k), &k, |b, &k| {
            let config = KMeansConfig::new(k).with_max_iterations(20);
            b.iter(|| {
                let mut rng = ChaCha20Rng::seed_from_u64(7);
                black_box(fit(&data, &config, &Euclidean, &mut rng).unwrap())
            });
        });
        group.bench_with_input(BenchmarkId::new("parallel", k), &k, |b, &k| {
            let config = KMeansConfig::new(k).with_max_iterations(20).with_parallel(true);
            b.iter(|| {
                let mut rng = ChaCha20Rng::seed_from_u64(7);
                black_box(fit(&data, &config, &Euclidean, &mut rng).unwrap())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fit);
criterion_main!(benches);
