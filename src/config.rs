//! Command-line and environment configuration

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::loader::ArtifactPaths;
use crate::recommend::DEFAULT_RECOMMENDATIONS;

/// Where to find the artifacts and how many titles to recommend.
#[derive(Args, Debug, Clone, Default)]
pub struct AppConfig {
    /// Directory holding the artifacts. Defaults to the executable's directory.
    #[arg(long, env = "MOVIEREC_ARTIFACT_DIR", global = true)]
    pub artifact_dir: Option<PathBuf>,

    /// Catalog table (CSV with a `title` column)
    #[arg(long, env = "MOVIEREC_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Feature matrix file
    #[arg(long, env = "MOVIEREC_FEATURES", global = true)]
    pub features: Option<PathBuf>,

    /// Fitted neighbor index file
    #[arg(long, env = "MOVIEREC_INDEX", global = true)]
    pub index: Option<PathBuf>,

    /// Number of recommendations per request
    #[arg(
        short,
        long,
        env = "MOVIEREC_K",
        global = true,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub k: Option<u64>,
}

impl AppConfig {
    /// Resolve the artifact paths. Explicit file paths override the directory.
    pub fn artifact_paths(&self) -> Result<ArtifactPaths> {
        let mut paths = match &self.artifact_dir {
            Some(dir) => ArtifactPaths::in_dir(dir),
            None => ArtifactPaths::beside_executable()?,
        };
        if let Some(catalog) = &self.catalog {
            paths.catalog = catalog.clone();
        }
        if let Some(features) = &self.features {
            paths.features = features.clone();
        }
        if let Some(index) = &self.index {
            paths.index = index.clone();
        }
        Ok(paths)
    }

    /// Requested recommendation count, or the default.
    pub fn count(&self) -> usize {
        self.k
            .map(|k| usize::try_from(k).unwrap_or(usize::MAX))
            .unwrap_or(DEFAULT_RECOMMENDATIONS)
    }
}
