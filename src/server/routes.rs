//! HTTP route handlers for the recommender API.

use crate::error::{ErrorKind, RecommenderError};
use crate::index::NeighborIndex;
use crate::metrics::MetricsCollector;
use crate::recommend::Recommender;
use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

// --- Request/Response types ---

#[derive(Deserialize)]
pub struct RecommendRequest {
    pub title: String,
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct RecommendationResponse {
    pub rank: usize,
    pub title: String,
    pub distance: f32,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub recommendations: Vec<RecommendationResponse>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub movie_count: usize,
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub total_requests: u64,
    pub total_failures: u64,
    pub unknown_title: u64,
    pub invalid_request: u64,
    pub internal_failures: u64,
    pub latency_samples: usize,
    pub avg_latency_us: f64,
    pub p50_latency_us: f64,
    pub p95_latency_us: f64,
    pub p99_latency_us: f64,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
}

fn error_response(err: &RecommenderError) -> (StatusCode, Json<ErrorResponse>) {
    let kind = err.kind();
    let status = match kind {
        ErrorKind::UnknownTitle => StatusCode::NOT_FOUND,
        ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Data | ErrorKind::Index => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            kind,
        }),
    )
}

// A poisoned metrics lock only means a handler panicked mid-update; the
// counters are still usable.
fn metrics_read<I: NeighborIndex>(state: &AppState<I>) -> RwLockReadGuard<'_, MetricsCollector> {
    state.metrics.read().unwrap_or_else(|e| e.into_inner())
}

fn metrics_write<I: NeighborIndex>(state: &AppState<I>) -> RwLockWriteGuard<'_, MetricsCollector> {
    state.metrics.write().unwrap_or_else(|e| e.into_inner())
}

// --- Router ---

pub fn create_router<I: NeighborIndex + Send + Sync + 'static>(state: Arc<AppState<I>>) -> Router {
    Router::new()
        .route("/titles", get(list_titles::<I>))
        .route("/recommendations", post(recommend::<I>))
        .route("/health", get(health::<I>))
        .route("/metrics", get(get_metrics::<I>))
        .with_state(state)
}

// --- Handlers ---

async fn list_titles<I: NeighborIndex + Send + Sync + 'static>(
    State(state): State<Arc<AppState<I>>>,
) -> Json<Vec<String>> {
    Json(state.context.catalog().titles().map(str::to_string).collect())
}

async fn recommend<I: NeighborIndex + Send + Sync + 'static>(
    State(state): State<Arc<AppState<I>>>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, (StatusCode, Json<ErrorResponse>)> {
    let k = req.k.unwrap_or(state.default_k);
    let start = Instant::now();

    let result = Recommender::new(&state.context).recommend_title(&req.title, k);
    let elapsed = start.elapsed();

    match result {
        Ok(recs) => {
            metrics_write(&state).record_success(elapsed);
            Ok(Json(RecommendResponse {
                query: recs.query_title,
                recommendations: recs
                    .items
                    .into_iter()
                    .map(|r| RecommendationResponse {
                        rank: r.rank,
                        title: r.title,
                        distance: r.distance,
                    })
                    .collect(),
            }))
        }
        Err(e) => {
            tracing::warn!(title = %req.title, k, error = %e, "recommendation failed");
            metrics_write(&state).record_failure(e.kind());
            Err(error_response(&e))
        }
    }
}

async fn health<I: NeighborIndex + Send + Sync + 'static>(
    State(state): State<Arc<AppState<I>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        movie_count: state.context.len(),
    })
}

async fn get_metrics<I: NeighborIndex + Send + Sync + 'static>(
    State(state): State<Arc<AppState<I>>>,
) -> Json<MetricsResponse> {
    let metrics = metrics_read(&state);

    Json(MetricsResponse {
        total_requests: metrics.total_requests(),
        total_failures: metrics.total_failures(),
        unknown_title: metrics.unknown_title(),
        invalid_request: metrics.invalid_request(),
        internal_failures: metrics.internal_failures(),
        latency_samples: metrics.latency_samples(),
        avg_latency_us: metrics.avg_latency_us(),
        p50_latency_us: metrics.percentile_latency_us(50.0),
        p95_latency_us: metrics.percentile_latency_us(95.0),
        p99_latency_us: metrics.percentile_latency_us(99.0),
    })
}
