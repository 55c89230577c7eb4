use std::fmt;
use std::hash::{Hash, Hasher};

use super::record::{hash_values, values_eq, FeatureSchema};

/// The representative point of one cluster.
///
/// A centroid is never updated in place: relocation builds a new generation,
/// so two generations can be compared by value. Equality and hashing look at
/// the coordinates only.
#[derive(Debug, Clone)]
pub struct Centroid {
    coordinates: Vec<f64>,
}

impl Centroid {
    pub fn new(coordinates: Vec<f64>) -> Self {
        Self { coordinates }
    }

    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    pub fn dim(&self) -> usize {
        self.coordinates.len()
    }

    /// Coordinate of the feature called `name`, looked up through `schema`.
    pub fn coordinate(&self, schema: &FeatureSchema, name: &str) -> Option<f64> {
        schema
            .index_of(name)
            .and_then(|i| self.coordinates.get(i).copied())
    }

    pub fn into_coordinates(self) -> Vec<f64> {
        self.coordinates
    }
}

impl PartialEq for Centroid {
    fn eq(&self, other: &Self) -> bool {
        values_eq(&self.coordinates, &other.coordinates)
    }
}

impl Eq for Centroid {}

impl Hash for Centroid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_values(&self.coordinates, state);
    }
}

impl From<Vec<f64>> for Centroid {
    fn from(coordinates: Vec<f64>) -> Self {
        Self::new(coordinates)
    }
}

impl fmt::Display for Centroid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Centroid{:?}", self.coordinates)
    }
}
