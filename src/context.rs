//! Immutable recommender context: catalog, features, and neighbor index

use crate::catalog::Catalog;
use crate::error::{Result, RecommenderError};
use crate::features::FeatureStore;
use crate::index::NeighborIndex;

/// The three aligned artifacts, built once at startup and shared read-only.
///
/// Construction checks that all three have the same row count and that the
/// feature dimension matches the index dimension.
#[derive(Debug)]
pub struct RecommenderContext<I: NeighborIndex> {
    catalog: Catalog,
    features: FeatureStore,
    index: I,
}

impl<I: NeighborIndex> RecommenderContext<I> {
    pub fn new(catalog: Catalog, features: FeatureStore, index: I) -> Result<Self> {
        if catalog.len() != features.len() || catalog.len() != index.len() {
            return Err(RecommenderError::AlignmentMismatch {
                catalog: catalog.len(),
                features: features.len(),
                index: index.len(),
            });
        }
        if !features.is_empty() && features.dimension() != index.dimension() {
            return Err(RecommenderError::DimensionMismatch {
                expected: index.dimension(),
                actual: features.dimension(),
            });
        }

        Ok(Self {
            catalog,
            features,
            index,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn features(&self) -> &FeatureStore {
        &self.features
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Number of movies (identical across all three artifacts).
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}
