//! HTTP API for the recommender.

pub mod routes;

use crate::context::RecommenderContext;
use crate::index::NeighborIndex;
use crate::metrics::MetricsCollector;
use std::sync::{Arc, RwLock};

/// Shared application state for the HTTP server.
///
/// The context is immutable after load, so only the metrics need a lock.
pub struct AppState<I: NeighborIndex> {
    pub context: RecommenderContext<I>,
    pub metrics: RwLock<MetricsCollector>,
    pub default_k: usize,
}

impl<I: NeighborIndex> AppState<I> {
    pub fn new(context: RecommenderContext<I>, default_k: usize) -> Self {
        Self {
            context,
            metrics: RwLock::new(MetricsCollector::new()),
            default_k,
        }
    }
}

/// Start the HTTP server over an already loaded context.
pub async fn start<I>(addr: &str, context: RecommenderContext<I>, default_k: usize) -> anyhow::Result<()>
where
    I: NeighborIndex + Send + Sync + 'static,
{
    let state = Arc::new(AppState::new(context, default_k));

    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
