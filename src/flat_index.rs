//! Brute-force flat index — exact O(n) k-NN search over fitted rows

use std::cmp::Ordering;
use std::path::Path;

use rayon::prelude::*;

use crate::artifact::{self, IndexArtifact, FORMAT_VERSION};
use crate::distance::{self, DistanceMetric};
use crate::error::{Result, RecommenderError};
use crate::index::{Neighbor, NeighborIndex};
use crate::vector::Vector;

/// Row counts at or above this are scanned with rayon.
const PARALLEL_THRESHOLD: usize = 4096;

/// Cosine distance assigned to an all-zero fitted row.
const ZERO_ROW_COSINE_DISTANCE: f32 = 1.0;

/// A flat (brute-force) index that computes distance to every fitted row.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    /// Concatenated rows of length `dimension`
    rows: Vec<f32>,
    dimension: usize,
    len: usize,
    metric: DistanceMetric,
    normalize: bool,
}

impl FlatIndex {
    /// Fit an index over `rows`. With `normalize`, rows are stored L2-normalized
    /// and every query is normalized the same way before search. All-zero rows
    /// have no direction and are stored as zeros.
    pub fn fit(metric: DistanceMetric, normalize: bool, rows: &[Vector]) -> Result<Self> {
        let dimension = rows.first().map(Vector::dimension).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * dimension);

        for row in rows {
            if row.dimension() != dimension {
                return Err(RecommenderError::DimensionMismatch {
                    expected: dimension,
                    actual: row.dimension(),
                });
            }
            if normalize && row.norm() > 0.0 {
                data.extend_from_slice(row.normalized()?.as_slice());
            } else {
                data.extend_from_slice(row.as_slice());
            }
        }

        Ok(Self {
            rows: data,
            dimension,
            len: rows.len(),
            metric,
            normalize,
        })
    }

    /// Rebuild an index from its serialized form.
    pub fn from_artifact(artifact: IndexArtifact) -> Result<Self> {
        let len = artifact.rows.len();
        let mut data = Vec::with_capacity(len * artifact.dimension);
        for row in &artifact.rows {
            if row.len() != artifact.dimension {
                return Err(RecommenderError::DimensionMismatch {
                    expected: artifact.dimension,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            rows: data,
            dimension: artifact.dimension,
            len,
            metric: artifact.metric,
            normalize: artifact.normalize,
        })
    }

    /// Convert to the serializable form.
    pub fn to_artifact(&self) -> IndexArtifact {
        IndexArtifact {
            version: FORMAT_VERSION,
            metric: self.metric,
            normalize: self.normalize,
            dimension: self.dimension,
            rows: (0..self.len).map(|i| self.row(i).to_vec()).collect(),
        }
    }

    /// Load a fitted index from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_artifact(artifact::read_index(path)?)
    }

    /// Save the fitted index to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        artifact::write_index(path, &self.to_artifact())
    }

    /// Whether queries are normalized before search.
    pub fn normalizes(&self) -> bool {
        self.normalize
    }

    #[inline]
    fn row(&self, i: usize) -> &[f32] {
        let start = i * self.dimension;
        &self.rows[start..start + self.dimension]
    }

    fn prepare_query(&self, query: &Vector) -> Result<Vector> {
        if query.dimension() != self.dimension {
            return Err(RecommenderError::DimensionMismatch {
                expected: self.dimension,
                actual: query.dimension(),
            });
        }
        if !query.is_finite() {
            return Err(RecommenderError::InvalidVector {
                reason: "Query contains NaN or infinite values".to_string(),
            });
        }
        let zero = query.norm() == 0.0;
        if zero && self.metric == DistanceMetric::Cosine {
            return Err(RecommenderError::InvalidVector {
                reason: "Cannot compute cosine distance with zero query vector".to_string(),
            });
        }
        if self.normalize && !zero {
            query.normalized()
        } else {
            Ok(query.clone())
        }
    }
}

fn by_distance_then_row(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then(a.row_index.cmp(&b.row_index))
}

impl NeighborIndex for FlatIndex {
    fn kneighbors(&self, query: &Vector, k: usize) -> Result<Vec<Neighbor>> {
        let query = self.prepare_query(query)?;
        if k == 0 || self.len == 0 {
            return Ok(Vec::new());
        }

        let score = |i: usize| -> Result<Neighbor> {
            let row = self.row(i);
            // A zero row is never similar to anything, but must not fail the scan.
            let distance = if self.metric == DistanceMetric::Cosine
                && distance::dot_product(row, row) == 0.0
            {
                ZERO_ROW_COSINE_DISTANCE
            } else {
                self.metric.distance_slices(query.as_slice(), row)?
            };
            Ok(Neighbor {
                row_index: i,
                distance,
            })
        };

        let mut results: Vec<Neighbor> = if self.len >= PARALLEL_THRESHOLD {
            (0..self.len).into_par_iter().map(score).collect::<Result<_>>()?
        } else {
            (0..self.len).map(score).collect::<Result<_>>()?
        };

        if k < results.len() {
            results.select_nth_unstable_by(k - 1, by_distance_then_row);
            results.truncate(k);
        }
        results.sort_by(by_distance_then_row);
        Ok(results)
    }

    fn metric(&self) -> DistanceMetric {
        self.metric
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.len
    }
}
