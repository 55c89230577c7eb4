/// A distance between two feature vectors.
///
/// Implementations must return a non-negative value and should be
/// deterministic and symmetric. `Sync` is required so the assignment step
/// can evaluate the metric from several threads.
pub trait DistanceMetric: Sync {
    /// Compute the distance between `a` and `b`.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

/// Euclidean distance `sqrt(sum((a_i - b_i)^2))`.
///
/// Components past the end of the shorter vector are ignored, so two empty
/// vectors are at distance 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl DistanceMetric for Euclidean {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b.iter())
            .fold(0.0, |acc, (&x, &y)| acc + (x - y).powi(2))
            .sqrt()
    }
}

impl<F> DistanceMetric for F
where
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        self(a, b)
    }
}
