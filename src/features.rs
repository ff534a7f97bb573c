//! Read-only feature store: one row per catalog entry

use std::path::Path;

use crate::artifact::{self, FeatureMatrix};
use crate::error::{Result, RecommenderError};
use crate::vector::Vector;

/// Precomputed feature matrix, row-aligned with the catalog.
#[derive(Debug, Clone)]
pub struct FeatureStore {
    matrix: FeatureMatrix,
}

impl FeatureStore {
    /// Build a store from in-memory rows. All rows must share one dimension.
    pub fn from_rows(rows: &[Vector]) -> Result<Self> {
        let dimension = rows.first().map(Vector::dimension).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * dimension);
        for row in rows {
            if row.dimension() != dimension {
                return Err(RecommenderError::DimensionMismatch {
                    expected: dimension,
                    actual: row.dimension(),
                });
            }
            data.extend_from_slice(row.as_slice());
        }

        Ok(Self {
            matrix: FeatureMatrix {
                dimension,
                rows: rows.len(),
                data,
            },
        })
    }

    /// Load the feature matrix artifact.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let matrix = artifact::read_features(path)?;
        Ok(Self { matrix })
    }

    /// Fetch the feature row at `row`.
    pub fn row(&self, row: usize) -> Result<Vector> {
        if row >= self.matrix.rows {
            return Err(RecommenderError::RowOutOfRange {
                row,
                len: self.matrix.rows,
            });
        }
        let start = row * self.matrix.dimension;
        let vector = Vector::from(&self.matrix.data[start..start + self.matrix.dimension]);
        if !vector.is_finite() {
            return Err(RecommenderError::InvalidVector {
                reason: format!("Feature row {} contains NaN or infinite values", row),
            });
        }
        Ok(vector)
    }

    pub fn dimension(&self) -> usize {
        self.matrix.dimension
    }

    pub fn len(&self) -> usize {
        self.matrix.rows
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.rows == 0
    }
}
