//! Neighbor index trait for fitted, read-only search backends

use crate::distance::DistanceMetric;
use crate::error::Result;
use crate::vector::Vector;
use serde::Serialize;

/// One search hit: a row of the fitted index and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub row_index: usize,
    pub distance: f32,
}

/// A precomputed structure answering "k nearest rows" queries.
///
/// Rows are addressed by their 0-based position, which is the same position
/// the catalog and feature store use. The metric and any preprocessing are
/// fixed when the index is fitted.
pub trait NeighborIndex {
    /// Find the `k` nearest rows to `query`.
    /// Returns at most `k` neighbors sorted by distance ascending, ties by row.
    fn kneighbors(&self, query: &Vector, k: usize) -> Result<Vec<Neighbor>>;

    /// The distance metric this index was fitted with.
    fn metric(&self) -> DistanceMetric;

    /// Dimension of the fitted rows.
    fn dimension(&self) -> usize;

    /// The number of fitted rows.
    fn len(&self) -> usize;

    /// Whether the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
