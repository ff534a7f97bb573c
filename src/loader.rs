//! Startup loader for the three aligned artifacts

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::context::RecommenderContext;
use crate::error::{Result, RecommenderError};
use crate::features::FeatureStore;
use crate::flat_index::FlatIndex;
use crate::index::NeighborIndex;

pub const CATALOG_FILE: &str = "movies_data.csv";
pub const FEATURES_FILE: &str = "movies_features.bin";
pub const INDEX_FILE: &str = "knn_movie_recommender.bin";

/// Locations of the catalog table, feature matrix, and fitted index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub catalog: PathBuf,
    pub features: PathBuf,
    pub index: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            catalog: dir.join(CATALOG_FILE),
            features: dir.join(FEATURES_FILE),
            index: dir.join(INDEX_FILE),
        }
    }

    /// Default file names next to the running executable.
    pub fn beside_executable() -> Result<Self> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::in_dir(dir))
    }

    /// Paths in load order.
    pub fn all(&self) -> [&Path; 3] {
        [&self.catalog, &self.features, &self.index]
    }

    /// Fail with the first path that does not exist.
    pub fn ensure_present(&self) -> Result<()> {
        for path in self.all() {
            if !path.exists() {
                return Err(RecommenderError::MissingArtifact {
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(())
    }
}

/// Human-readable description of a loaded context, printed as JSON by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub catalog: PathBuf,
    pub features: PathBuf,
    pub index: PathBuf,
    pub movies: usize,
    pub dimension: usize,
    pub metric: String,
    pub normalize: bool,
}

impl ArtifactSummary {
    pub fn new(paths: &ArtifactPaths, ctx: &RecommenderContext<FlatIndex>) -> Self {
        Self {
            catalog: paths.catalog.clone(),
            features: paths.features.clone(),
            index: paths.index.clone(),
            movies: ctx.len(),
            dimension: ctx.features().dimension(),
            metric: ctx.index().metric().to_string(),
            normalize: ctx.index().normalizes(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RecommenderError::SerializationError(e.to_string()))
    }
}

/// Load all three artifacts and check their alignment.
///
/// Nothing is read until every path has been confirmed to exist.
pub fn load(paths: &ArtifactPaths) -> Result<RecommenderContext<FlatIndex>> {
    paths.ensure_present()?;
    let start = Instant::now();

    let catalog = Catalog::load(&paths.catalog)?;
    let features = FeatureStore::load(&paths.features)?;
    let index = FlatIndex::load(&paths.index)?;

    let ctx = RecommenderContext::new(catalog, features, index)?;

    tracing::info!(
        movies = ctx.len(),
        dimension = ctx.features().dimension(),
        metric = %ctx.index().metric(),
        normalize = ctx.index().normalizes(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "loaded recommender artifacts"
    );
    Ok(ctx)
}
