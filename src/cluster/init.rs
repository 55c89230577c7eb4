//! Starting-centroid strategies.
//!
//! [`UniformBounds`] is the default used by [`fit`](super::fit). The other
//! strategies exist for callers who want data-driven seeds.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use super::centroid::Centroid;
use super::distance::DistanceMetric;
use super::record::Dataset;

/// Produces the first generation of centroids.
///
/// `data` is never empty and `k` is at least 1 when called from `fit`.
/// Implementations must return exactly `k` centroids of dimension
/// `data.dim()`.
pub trait Initializer {
    fn initialize(&self, data: &Dataset, k: usize, rng: &mut dyn RngCore) -> Vec<Centroid>;
}

/// Draws every coordinate uniformly inside the per-feature `[min, max]`
/// range of the data.
///
/// Entropy is consumed centroid by centroid, feature by feature in schema
/// order, so a fixed seed reproduces the same generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformBounds;

impl Initializer for UniformBounds {
    fn initialize(&self, data: &Dataset, k: usize, rng: &mut dyn RngCore) -> Vec<Centroid> {
        let bounds = match data.bounds() {
            Some(b) => b,
            None => return Vec::new(),
        };
        (0..k)
            .map(|_| {
                let coordinates = bounds
                    .iter()
                    .map(|&(min, max)| uniform_between(rng.gen::<f64>(), min, max))
                    .collect();
                Centroid::new(coordinates)
            })
            .collect()
    }
}

/// `min + u * (max - min)`, falling back to a weighted sum when the span
/// itself overflows.
fn uniform_between(u: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span.is_finite() {
        u * span + min
    } else {
        (min * (1.0 - u) + max * u).clamp(min, max)
    }
}

/// Uses `k` distinct records as seeds. When `k` exceeds the number of
/// records the remaining seeds are drawn with replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSample;

impl Initializer for RandomSample {
    fn initialize(&self, data: &Dataset, k: usize, rng: &mut dyn RngCore) -> Vec<Centroid> {
        let records = data.records();
        let mut centroids: Vec<Centroid> = records
            .choose_multiple(rng, k)
            .map(|r| Centroid::new(r.values().to_vec()))
            .collect();
        while centroids.len() < k {
            match records.choose(rng) {
                Some(r) => centroids.push(Centroid::new(r.values().to_vec())),
                None => break,
            }
        }
        centroids
    }
}

/// k-means++ seeding: each new seed is a record picked with probability
/// proportional to its squared distance from the nearest seed so far.
#[derive(Debug, Clone, Copy, Default)]
pub struct KMeansPlusPlus<D> {
    metric: D,
}

impl<D: DistanceMetric> KMeansPlusPlus<D> {
    pub fn new(metric: D) -> Self {
        Self { metric }
    }
}

impl<D: DistanceMetric> Initializer for KMeansPlusPlus<D> {
    fn initialize(&self, data: &Dataset, k: usize, rng: &mut dyn RngCore) -> Vec<Centroid> {
        let records = data.records();
        if records.is_empty() || k == 0 {
            return Vec::new();
        }
        let mut centroids = Vec::with_capacity(k);
        let first = &records[rng.gen_range(0..records.len())];
        centroids.push(Centroid::new(first.values().to_vec()));

        let mut nearest_sq: Vec<f64> = records
            .iter()
            .map(|r| self.metric.distance(r.values(), first.values()).powi(2))
            .collect();

        while centroids.len() < k {
            let total: f64 = nearest_sq.iter().sum();
            let chosen = if total > 0.0 && total.is_finite() {
                let mut target = rng.gen::<f64>() * total;
                let mut idx = nearest_sq
                    .iter()
                    .rposition(|&w| w > 0.0)
                    .unwrap_or(records.len() - 1);
                for (i, &w) in nearest_sq.iter().enumerate() {
                    if target < w {
                        idx = i;
                        break;
                    }
                    target -= w;
                }
                idx
            } else {
                rng.gen_range(0..records.len())
            };

            let seed = records[chosen].values();
            for (d, r) in nearest_sq.iter_mut().zip(records) {
                let candidate = self.metric.distance(r.values(), seed).powi(2);
                if candidate < *d {
                    *d = candidate;
                }
            }
            centroids.push(Centroid::new(seed.to_vec()));
        }
        centroids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::distance::Euclidean;
    use crate::cluster::record::{FeatureRecord, FeatureSchema};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn sample_data() -> Dataset {
        let records = vec![
            FeatureRecord::new("a", vec![10.0, 0.0, 100.0]),
            FeatureRecord::new("b", vec![20.0, 50.0, 100.0]),
            FeatureRecord::new("c", vec![15.0, 255.0, 100.0]),
        ];
        Dataset::new(FeatureSchema::rgb(), records).unwrap()
    }

    #[test]
    fn test_uniform_bounds_within_range() {
        let data = sample_data();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let centroids = UniformBounds.initialize(&data, 16, &mut rng);
        assert_eq!(centroids.len(), 16);
        for c in &centroids {
            let v = c.coordinates();
            assert_eq!(v.len(), 3);
            assert!((10.0..=20.0).contains(&v[0]));
            assert!((0.0..=255.0).contains(&v[1]));
            // min == max collapses the range to a single value
            assert_eq!(v[2], 100.0);
        }
    }

    #[test]
    fn test_uniform_bounds_with_extreme_range() {
        let records = vec![
            FeatureRecord::new("lo", vec![-f64::MAX, 0.0, 0.0]),
            FeatureRecord::new("hi", vec![f64::MAX, 1.0, 1.0]),
        ];
        let data = Dataset::new(FeatureSchema::rgb(), records).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        for c in UniformBounds.initialize(&data, 32, &mut rng) {
            assert!(c.coordinates().iter().all(|v| v.is_finite()));
        }
        assert_eq!(uniform_between(0.0, -f64::MAX, f64::MAX), -f64::MAX);
        assert_eq!(uniform_between(1.0, -f64::MAX, f64::MAX), f64::MAX);
    }

    #[test]
    fn test_uniform_bounds_reproducible() {
        let data = sample_data();
        let a = UniformBounds.initialize(&data, 4, &mut ChaCha20Rng::seed_from_u64(42));
        let b = UniformBounds.initialize(&data, 4, &mut ChaCha20Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_sample_pads_with_replacement() {
        let data = sample_data();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let centroids = RandomSample.initialize(&data, 5, &mut rng);
        assert_eq!(centroids.len(), 5);
        for c in &centroids {
            assert!(data.records().iter().any(|r| r.values() == c.coordinates()));
        }
        // the first three are distinct records
        assert_ne!(centroids[0], centroids[1]);
        assert_ne!(centroids[1], centroids[2]);
        assert_ne!(centroids[0], centroids[2]);
    }

    #[test]
    fn test_kmeans_plus_plus_picks_distinct_points() {
        let data = sample_data();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let centroids = KMeansPlusPlus::new(Euclidean).initialize(&data, 3, &mut rng);
        assert_eq!(centroids.len(), 3);
        // once a point is chosen its weight is zero, so all three must differ
        assert_ne!(centroids[0], centroids[1]);
        assert_ne!(centroids[1], centroids[2]);
        assert_ne!(centroids[0], centroids[2]);
    }

    #[test]
    fn test_kmeans_plus_plus_identical_points() {
        let records = (0..4)
            .map(|i| FeatureRecord::new(i.to_string(), vec![5.0, 5.0, 5.0]))
            .collect();
        let data = Dataset::new(FeatureSchema::rgb(), records).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let centroids = KMeansPlusPlus::new(Euclidean).initialize(&data, 3, &mut rng);
        assert_eq!(centroids, vec![Centroid::new(vec![5.0, 5.0, 5.0]); 3]);
    }
}
