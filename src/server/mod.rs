mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::RwLock;

use crate::api::LineFeedClient;
use crate::config::Config;
use crate::feed::Dataset;

/// Shared handles the route handlers work against.
///
/// The dataset slot is replaced wholesale after a successful fetch or load;
/// readers see either the old or the new dataset, never a partial one.
/// Overlapping fetches are last-write-wins.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<RwLock<Option<Dataset>>>,
    pub client: Arc<LineFeedClient>,
    pub config: Arc<Config>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::dashboard))
        .route("/health", get(routes::health))
        .route("/api/summary", get(routes::summary))
        .route("/api/matches", get(routes::matches))
        .route("/api/matches/:id", get(routes::match_by_id))
        .route("/api/leagues", get(routes::leagues))
        .route("/api/fetch-live", post(routes::fetch_live))
        .route("/api/export/csv", get(routes::export_csv))
        .route("/api/export/json", get(routes::export_json))
        .with_state(state)
}
