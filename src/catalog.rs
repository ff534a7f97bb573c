//! Movie catalog and title resolution

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, RecommenderError};

/// Column that holds the movie title in the catalog table.
pub const TITLE_COLUMN: &str = "title";

/// One catalog entry. `row_index` is shared with the feature store and the
/// neighbor index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecord {
    pub row_index: usize,
    pub title: String,
    /// Remaining columns of the catalog row, kept verbatim for display.
    pub extra: BTreeMap<String, String>,
}

/// Ordered collection of movie records.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<MovieRecord>,
    /// Title -> first row with that title
    first_row: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from titles in row order.
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let records = titles
            .into_iter()
            .enumerate()
            .map(|(row_index, title)| MovieRecord {
                row_index,
                title: title.into(),
                extra: BTreeMap::new(),
            })
            .collect();
        Self::from_records(records)
    }

    fn from_records(records: Vec<MovieRecord>) -> Self {
        let mut first_row = HashMap::with_capacity(records.len());
        for record in &records {
            first_row
                .entry(record.title.clone())
                .or_insert(record.row_index);
        }
        Self { records, first_row }
    }

    /// Load the catalog table. The file must be CSV with a header row that
    /// includes a `title` column.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let title_idx = headers
            .iter()
            .position(|h| h.trim() == TITLE_COLUMN)
            .ok_or_else(|| RecommenderError::MissingColumn {
                path: path.to_path_buf(),
                column: TITLE_COLUMN.to_string(),
            })?;

        let mut records = Vec::new();
        for (row_index, row) in reader.records().enumerate() {
            let row = row?;
            let mut extra = BTreeMap::new();
            let mut title = String::new();
            for (col, (name, value)) in headers.iter().zip(row.iter()).enumerate() {
                if col == title_idx {
                    title = value.to_string();
                } else {
                    extra.insert(name.to_string(), value.to_string());
                }
            }
            records.push(MovieRecord {
                row_index,
                title,
                extra,
            });
        }

        let catalog = Self::from_records(records);
        let duplicates = catalog.len() - catalog.first_row.len();
        if duplicates > 0 {
            tracing::warn!(
                path = %path.display(),
                duplicates,
                "catalog has repeated titles; the first occurrence wins"
            );
        }
        Ok(catalog)
    }

    /// Map a title to its row index. Repeated titles resolve to the first
    /// occurrence in catalog order.
    pub fn resolve(&self, title: &str) -> Result<usize> {
        self.first_row
            .get(title)
            .copied()
            .ok_or_else(|| RecommenderError::TitleNotFound {
                title: title.to_string(),
            })
    }

    /// Number of rows carrying exactly `title`.
    pub fn count_title(&self, title: &str) -> usize {
        self.records.iter().filter(|r| r.title == title).count()
    }

    /// Record at `row`.
    pub fn get(&self, row: usize) -> Option<&MovieRecord> {
        self.records.get(row)
    }

    /// Title at `row`.
    pub fn title(&self, row: usize) -> Result<&str> {
        self.records
            .get(row)
            .map(|r| r.title.as_str())
            .ok_or(RecommenderError::RowOutOfRange {
                row,
                len: self.records.len(),
            })
    }

    /// All titles in catalog order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.title.as_str())
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
