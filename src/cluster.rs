//! K-means clustering over fixed-schema feature vectors.
//!
//! The engine is split along the steps of Lloyd's algorithm:
//! - [`init`]: the first centroid generation
//! - [`assign`]: nearest-centroid partition of the records
//! - [`relocate`]: the next generation as per-cluster means
//! - [`kmeans`]: the loop driving assignment and relocation until the
//!   partition stops changing or the iteration cap is reached
//!
//! # Examples
//!
//! ```rust
//! use palette_kmeans::cluster::{fit, Dataset, Euclidean, FeatureRecord, FeatureSchema, KMeansConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let records = (0..10)
//!     .map(|i| FeatureRecord::new(i.to_string(), vec![i as f64 * 25.0, 0.0, 0.0]))
//!     .collect();
//! let data = Dataset::new(FeatureSchema::rgb(), records).unwrap();
//! let mut rng = ChaCha20Rng::seed_from_u64(7);
//! let clustering = fit(&data, &KMeansConfig::new(3), &Euclidean, &mut rng).unwrap();
//! assert_eq!(clustering.clusters().len(), 3);
//! ```

pub mod assign;
pub mod centroid;
pub mod distance;
pub mod init;
pub mod kmeans;
pub mod record;
pub mod relocate;

pub use assign::{assign, assign_parallel, nearest_centroid, Cluster, Partition};
pub use centroid::Centroid;
pub use distance::{DistanceMetric, Euclidean};
pub use init::{Initializer, KMeansPlusPlus, RandomSample, UniformBounds};
pub use kmeans::{fit, fit_with, Clustering, KMeansConfig, Termination};
pub use record::{Dataset, FeatureRecord, FeatureSchema};
pub use relocate::relocate;
