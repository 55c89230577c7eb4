pub mod cluster;
pub mod error;
pub mod palette;

pub use cluster::{
    fit, fit_with, Centroid, Clustering, Dataset, DistanceMetric, Euclidean, FeatureRecord,
    FeatureSchema, KMeansConfig, Termination,
};
pub use error::{Error, Result};
pub use palette::{palettize, Palette, PaletteExtractor};
