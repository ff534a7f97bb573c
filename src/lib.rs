//! # Movie Recommender
//!
//! Nearest-neighbor movie recommendations over precomputed artifacts.
//!
//! This library provides:
//! - Catalog loading and title resolution
//! - A read-only feature store and fitted flat neighbor index
//! - The recommendation engine (k nearest titles, query excluded)
//! - Terminal and HTTP presentation layers
//!
//! ## Example
//!
//! ```rust
//! use movie_recommender::{
//!     Catalog, DistanceMetric, FeatureStore, FlatIndex, Recommender, RecommenderContext, Vector,
//! };
//!
//! let rows = vec![
//!     Vector::new(vec![0.0, 0.0]),
//!     Vector::new(vec![1.0, 0.0]),
//!     Vector::new(vec![5.0, 0.0]),
//! ];
//! let ctx = RecommenderContext::new(
//!     Catalog::from_titles(["Alien", "Aliens", "Heat"]),
//!     FeatureStore::from_rows(&rows).unwrap(),
//!     FlatIndex::fit(DistanceMetric::Euclidean, false, &rows).unwrap(),
//! )
//! .unwrap();
//!
//! let recs = Recommender::new(&ctx).recommend_title("Alien", 1).unwrap();
//! assert_eq!(recs.titles(), vec!["Aliens"]);
//! ```

pub mod artifact;
pub mod catalog;
pub mod config;
pub mod context;
pub mod distance;
pub mod error;
pub mod features;
pub mod flat_index;
pub mod index;
pub mod loader;
pub mod metrics;
pub mod present;
pub mod recommend;
pub mod server;
pub mod vector;

pub use catalog::{Catalog, MovieRecord};
pub use context::RecommenderContext;
pub use distance::DistanceMetric;
pub use error::{ErrorKind, RecommenderError, Result};
pub use features::FeatureStore;
pub use flat_index::FlatIndex;
pub use index::{Neighbor, NeighborIndex};
pub use loader::ArtifactPaths;
pub use recommend::{Recommendation, Recommendations, Recommender, DEFAULT_RECOMMENDATIONS};
pub use vector::Vector;
