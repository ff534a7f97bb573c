//! Recommendation engine: nearest titles to a selected movie

use serde::Serialize;

use crate::context::RecommenderContext;
use crate::error::{Result, RecommenderError};
use crate::index::NeighborIndex;

/// Number of recommendations returned when the caller does not ask for a count.
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// One recommended title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// 1-based position, nearest first
    pub rank: usize,
    pub row_index: usize,
    pub title: String,
    pub distance: f32,
}

/// Ranked recommendations for one query movie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub query_row: usize,
    pub query_title: String,
    pub items: Vec<Recommendation>,
}

impl Recommendations {
    /// Titles in rank order.
    pub fn titles(&self) -> Vec<&str> {
        self.items.iter().map(|r| r.title.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Answers recommendation requests against a loaded context.
pub struct Recommender<'a, I: NeighborIndex> {
    ctx: &'a RecommenderContext<I>,
}

impl<'a, I: NeighborIndex> Recommender<'a, I> {
    pub fn new(ctx: &'a RecommenderContext<I>) -> Self {
        Self { ctx }
    }

    /// Recommend up to `k` titles similar to the movie with `title`.
    pub fn recommend_title(&self, title: &str, k: usize) -> Result<Recommendations> {
        let row = self.ctx.catalog().resolve(title)?;
        self.recommend(row, k)
    }

    /// Recommend up to `k` titles similar to the movie at `row`.
    ///
    /// The query movie is excluded by row index, not by position, so a
    /// duplicate feature row sorting ahead of it cannot displace a real
    /// neighbor. Other rows carrying the query's title are dropped as well,
    /// so a repeated catalog entry is never recommended for itself. When `k`
    /// exceeds the number of other titles, every other title is returned.
    pub fn recommend(&self, row: usize, k: usize) -> Result<Recommendations> {
        if k == 0 {
            return Err(RecommenderError::InvalidCount { count: k });
        }

        let catalog = self.ctx.catalog();
        let query_title = catalog.title(row)?.to_string();
        let query = self.ctx.features().row(row)?;

        // Every row sharing the query's title (the query included) is skipped.
        let skipped = catalog.count_title(&query_title).max(1);
        let wanted = k.saturating_add(skipped).min(self.ctx.index().len());
        let neighbors = self.ctx.index().kneighbors(&query, wanted)?;

        let mut items = Vec::with_capacity(k.min(neighbors.len()));
        for n in neighbors {
            if items.len() == k {
                break;
            }
            if n.row_index == row {
                continue;
            }
            let title = catalog.title(n.row_index)?;
            if title == query_title {
                continue;
            }
            items.push(Recommendation {
                rank: items.len() + 1,
                row_index: n.row_index,
                title: title.to_string(),
                distance: n.distance,
            });
        }

        tracing::debug!(
            row,
            title = %query_title,
            k,
            returned = items.len(),
            "computed recommendations"
        );

        Ok(Recommendations {
            query_row: row,
            query_title,
            items,
        })
    }
}
