//! Error types for the recommender

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for recommender operations
pub type Result<T> = std::result::Result<T, RecommenderError>;

/// Error types that can occur while loading artifacts or serving recommendations
#[derive(Error, Debug)]
pub enum RecommenderError {
    #[error("Required file not found: {}", path.display())]
    MissingArtifact { path: PathBuf },

    #[error("Corrupt artifact {}: {reason}", path.display())]
    CorruptArtifact { path: PathBuf, reason: String },

    #[error("Missing column '{column}' in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error(
        "Artifacts are not row-aligned: catalog has {catalog} rows, features have {features}, index has {index}"
    )]
    AlignmentMismatch {
        catalog: usize,
        features: usize,
        index: usize,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid vector: {reason}")]
    InvalidVector { reason: String },

    #[error("Title not found: {title}")]
    TitleNotFound { title: String },

    #[error("Row {row} out of range (catalog has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("Invalid recommendation count: {count} (must be at least 1)")]
    InvalidCount { count: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Index error: {0}")]
    IndexError(String),
}

/// Coarse classification of a failure, for presentation layers that need
/// to pick a status or a message style without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The selected title is not in the catalog.
    UnknownTitle,
    /// The request itself is malformed (bad count, bad row).
    InvalidRequest,
    /// Artifacts are missing, corrupt, or misaligned.
    Data,
    /// The neighbor search failed.
    Index,
}

impl RecommenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecommenderError::TitleNotFound { .. } => ErrorKind::UnknownTitle,
            RecommenderError::InvalidCount { .. } | RecommenderError::RowOutOfRange { .. } => {
                ErrorKind::InvalidRequest
            }
            RecommenderError::MissingArtifact { .. }
            | RecommenderError::CorruptArtifact { .. }
            | RecommenderError::MissingColumn { .. }
            | RecommenderError::AlignmentMismatch { .. }
            | RecommenderError::IoError(_)
            | RecommenderError::CsvError(_)
            | RecommenderError::SerializationError(_) => ErrorKind::Data,
            RecommenderError::DimensionMismatch { .. }
            | RecommenderError::InvalidVector { .. }
            | RecommenderError::IndexError(_) => ErrorKind::Index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_names_path() {
        let err = RecommenderError::MissingArtifact {
            path: PathBuf::from("/data/movies_data.csv"),
        };
        assert_eq!(
            err.to_string(),
            "Required file not found: /data/movies_data.csv"
        );
        assert_eq!(err.kind(), ErrorKind::Data);
    }

    #[test]
    fn test_error_kinds() {
        let unknown = RecommenderError::TitleNotFound {
            title: "Heat".to_string(),
        };
        assert_eq!(unknown.kind(), ErrorKind::UnknownTitle);

        let count = RecommenderError::InvalidCount { count: 0 };
        assert_eq!(count.kind(), ErrorKind::InvalidRequest);

        let dim = RecommenderError::DimensionMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(dim.kind(), ErrorKind::Index);
    }
}
