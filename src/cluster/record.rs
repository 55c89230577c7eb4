use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use ndarray::ArrayView2;

use crate::error::{Error, Result};

/// Ordered, unique feature names shared by every record of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Builds a schema from feature names.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSchema`] if `names` is empty or contains a duplicate.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(Error::InvalidSchema("schema has no features".into()));
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(Error::InvalidSchema(format!("duplicate feature `{}`", name)));
            }
        }
        Ok(Self { names })
    }

    /// The fixed `r, g, b` schema used for pixel colours.
    pub fn rgb() -> Self {
        Self {
            names: vec!["r".to_string(), "g".to_string(), "b".to_string()],
        }
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a constructed schema.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of `name` in the schema, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// An immutable labelled feature vector.
///
/// The label is carried for diagnostics only and never enters a distance
/// computation. Equality and hashing compare the label and the values, with
/// floats compared by bit pattern (`-0.0` and `0.0` are treated as equal).
#[derive(Debug, Clone)]
pub struct FeatureRecord {
    label: String,
    values: Vec<f64>,
}

impl FeatureRecord {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }
}

impl PartialEq for FeatureRecord {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && values_eq(&self.values, &other.values)
    }
}

impl Eq for FeatureRecord {}

impl Hash for FeatureRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
        hash_values(&self.values, state);
    }
}

impl fmt::Display for FeatureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.label, self.values)
    }
}

/// A validated collection of records sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    schema: FeatureSchema,
    records: Vec<FeatureRecord>,
}

impl Dataset {
    /// Builds a dataset, checking every record against `schema`.
    ///
    /// An empty record list is accepted here; `fit` rejects it.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if a record's length differs from the schema.
    /// - [`Error::NonFiniteFeature`] if a record holds NaN or an infinity.
    pub fn new(schema: FeatureSchema, records: Vec<FeatureRecord>) -> Result<Self> {
        for (index, record) in records.iter().enumerate() {
            if record.dim() != schema.len() {
                return Err(Error::DimensionMismatch {
                    index,
                    expected: schema.len(),
                    found: record.dim(),
                });
            }
            if let Some(pos) = record.values().iter().position(|v| !v.is_finite()) {
                return Err(Error::NonFiniteFeature {
                    index,
                    feature: schema.names()[pos].clone(),
                });
            }
        }
        Ok(Self { schema, records })
    }

    /// Builds a dataset from a matrix with one row per record and one column
    /// per schema feature. Records are labelled `row <i>`.
    pub fn from_matrix(schema: FeatureSchema, matrix: ArrayView2<'_, f64>) -> Result<Self> {
        if matrix.ncols() != schema.len() {
            return Err(Error::DimensionMismatch {
                index: 0,
                expected: schema.len(),
                found: matrix.ncols(),
            });
        }
        let records = matrix
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| FeatureRecord::new(format!("row {}", i), row.to_vec()))
            .collect();
        Self::new(schema, records)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.schema.len()
    }

    /// Per-feature `(min, max)` over all records, in schema order.
    /// Returns `None` for an empty dataset.
    pub fn bounds(&self) -> Option<Vec<(f64, f64)>> {
        let first = self.records.first()?;
        let mut bounds: Vec<(f64, f64)> = first.values().iter().map(|&v| (v, v)).collect();
        for record in &self.records[1..] {
            for (b, &v) in bounds.iter_mut().zip(record.values()) {
                if v < b.0 {
                    b.0 = v;
                }
                if v > b.1 {
                    b.1 = v;
                }
            }
        }
        Some(bounds)
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

pub(crate) fn values_eq(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(&x, &y)| canonical_bits(x) == canonical_bits(y))
}

pub(crate) fn hash_values<H: Hasher>(values: &[f64], state: &mut H) {
    values.len().hash(state);
    for &v in values {
        canonical_bits(v).hash(state);
    }
}
