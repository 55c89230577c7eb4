use log::{debug, trace};
use ndarray::Array2;
use rand::Rng;

use super::assign::{assign, assign_parallel, Cluster, Partition};
use super::centroid::Centroid;
use super::distance::DistanceMetric;
use super::init::{Initializer, UniformBounds};
use super::record::{Dataset, FeatureRecord};
use super::relocate::relocate;
use crate::error::{Error, Result};

/// Configuration options for k-means clustering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KMeansConfig {
    /// Number of clusters to find.
    pub k: usize,
    /// Maximum number of assignment passes.
    pub max_iterations: usize,
    /// Run the assignment step on the rayon thread pool.
    pub parallel: bool,
}

impl KMeansConfig {
    /// Create a new config with `max_iterations = 1000` and sequential assignment.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: 1000,
            parallel: false,
        }
    }

    /// Customize the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Enable or disable the parallel assignment step.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks the preconditions of [`fit`] against `data`.
    pub fn validate(&self, data: &Dataset) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidArgument("k must be at least 1".into()));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidArgument(
                "max_iterations must be at least 1".into(),
            ));
        }
        if data.is_empty() {
            return Err(Error::InvalidArgument("no records to cluster".into()));
        }
        Ok(())
    }
}

/// How the iteration loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// The partition matched the previous pass.
    Converged,
    /// `max_iterations` passes ran without the partition settling.
    Exhausted,
}

/// The final partition of a [`fit`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    partition: Partition,
    termination: Termination,
    iterations: usize,
}

impl Clustering {
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn into_partition(self) -> Partition {
        self.partition
    }

    pub fn clusters(&self) -> &[Cluster] {
        self.partition.clusters()
    }

    /// The final centroids, exactly `k` of them, possibly with repeats.
    pub fn centroids(&self) -> Vec<&Centroid> {
        self.partition.centroids().collect()
    }

    /// Member records of cluster `index`.
    pub fn members<'a>(&'a self, data: &'a Dataset, index: usize) -> Vec<&'a FeatureRecord> {
        self.partition
            .clusters()
            .get(index)
            .map(|c| c.records(data).collect())
            .unwrap_or_default()
    }

    /// Cluster index of each record of the clustered dataset.
    pub fn labels(&self) -> Vec<usize> {
        let n = self.partition.total_members();
        self.partition
            .labels(n)
            .into_iter()
            .map(|l| l.unwrap_or_default())
            .collect()
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    /// Number of relocation steps performed before the returned partition
    /// was built.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Sum of squared distances from each record to its centroid.
    pub fn inertia<D>(&self, data: &Dataset, metric: &D) -> f64
    where
        D: DistanceMetric + ?Sized,
    {
        self.partition
            .clusters()
            .iter()
            .flat_map(|c| {
                c.records(data)
                    .map(move |r| metric.distance(r.values(), c.centroid.coordinates()).powi(2))
            })
            .sum()
    }

    /// Centroids as a `k x dim` matrix.
    pub fn centroid_matrix(&self) -> Array2<f64> {
        let clusters = self.partition.clusters();
        let dim = clusters.first().map_or(0, |c| c.centroid.dim());
        Array2::from_shape_fn((clusters.len(), dim), |(i, j)| {
            clusters[i].centroid.coordinates()[j]
        })
    }
}

/// Runs k-means on `data`, seeding centroids with [`UniformBounds`].
///
/// Each pass assigns every record to its nearest centroid. The loop stops
/// when a pass reproduces the previous partition exactly, or after
/// `config.max_iterations` passes; either way the last partition is returned.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if `k` or `max_iterations` is 0, or `data` is empty.
///
/// # Example
///
/// ```
/// use palette_kmeans::{fit, Dataset, Euclidean, FeatureRecord, FeatureSchema, KMeansConfig};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let records = vec![
///     FeatureRecord::new("black", vec![0.0, 0.0, 0.0]),
///     FeatureRecord::new("white", vec![255.0, 255.0, 255.0]),
/// ];
/// let data = Dataset::new(FeatureSchema::rgb(), records).unwrap();
/// let config = KMeansConfig::new(2).with_max_iterations(50);
/// let mut rng = ChaCha20Rng::seed_from_u64(1);
///
/// let clustering = fit(&data, &config, &Euclidean, &mut rng).unwrap();
/// assert_eq!(clustering.centroids().len(), 2);
/// assert_eq!(clustering.partition().total_members(), 2);
/// ```
pub fn fit<D, R>(
    data: &Dataset,
    config: &KMeansConfig,
    metric: &D,
    rng: &mut R,
) -> Result<Clustering>
where
    D: DistanceMetric + ?Sized,
    R: Rng,
{
    fit_with(data, config, metric, &UniformBounds, rng)
}

/// Same as [`fit`] with a caller-chosen initializer.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] on the preconditions of [`fit`], or when the
///   initializer does not return `k` centroids of the dataset's dimension.
pub fn fit_with<D, I, R>(
    data: &Dataset,
    config: &KMeansConfig,
    metric: &D,
    initializer: &I,
    rng: &mut R,
) -> Result<Clustering>
where
    D: DistanceMetric + ?Sized,
    I: Initializer + ?Sized,
    R: Rng,
{
    config.validate(data)?;
    debug!(
        "k-means start: {} records, k = {}, max_iterations = {}",
        data.len(),
        config.k,
        config.max_iterations
    );

    let mut centroids = initializer.initialize(data, config.k, rng);
    if centroids.len() != config.k || centroids.iter().any(|c| c.dim() != data.dim()) {
        return Err(Error::InvalidArgument(format!(
            "initializer produced {} centroids, expected {} of dimension {}",
            centroids.len(),
            config.k,
            data.dim()
        )));
    }

    let mut previous = Partition::default();
    let mut iteration = 0;
    loop {
        // 1. Assignment step: nearest centroid for every record
        let partition = if config.parallel {
            assign_parallel(data, centroids, metric)
        } else {
            assign(data, centroids, metric)
        };
        // 2. Convergence check against the previous pass
        let stable = partition.is_stable_against(&previous);
        trace!(
            "pass {}: stable = {}, empty clusters = {}",
            iteration,
            stable,
            partition.empty_clusters()
        );

        if stable || iteration + 1 >= config.max_iterations {
            let termination = if stable {
                Termination::Converged
            } else {
                Termination::Exhausted
            };
            debug!("k-means {:?} after {} relocations", termination, iteration);
            return Ok(Clustering {
                partition,
                termination,
                iterations: iteration,
            });
        }

        // 3. Update step: the next generation from the member means
        centroids = relocate(data, &partition);
        previous = partition;
        iteration += 1;
    }
}
