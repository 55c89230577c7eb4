//! Error types shared by the clustering engine and the palette layer.

use thiserror::Error;

/// Errors reported at the call boundary of the clustering engine.
///
/// Empty clusters and hitting the iteration cap are not errors; see
/// [`Termination`](crate::cluster::Termination).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A precondition of `fit` was violated (`k`, `max_iterations` or an
    /// empty record set).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The feature schema is empty or names a feature twice.
    #[error("invalid feature schema: {0}")]
    InvalidSchema(String),

    /// A record does not have one value per schema feature.
    #[error("record {index} has {found} features, schema expects {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A record carries a NaN or infinite value.
    #[error("record {index} has a non-finite value for feature `{feature}`")]
    NonFiniteFeature { index: usize, feature: String },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
