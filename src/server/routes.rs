use std::path::Path as FilePath;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::response::Html;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::api::FeedEnvelope;
use crate::feed::{normalize_batch, DatasetSummary, LeagueCount};
use crate::models::Match;
use crate::server::AppState;
use crate::storage;

type ApiError = (StatusCode, Json<Value>);

fn no_data() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": "No data available" })),
    )
}

/// Filters for the match listing
#[derive(Debug, Deserialize)]
pub struct MatchFilter {
    pub sport: Option<String>,
    #[serde(default)]
    pub live_only: bool,
    pub min_odds: Option<f64>,
    pub limit: Option<usize>,
}

/// Override the configured sport/count for one fetch
#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    pub sports: Option<i64>,
    pub count: Option<u32>,
}

pub async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let guard = state.dataset.read().await;

    let body = match guard.as_ref() {
        Some(dataset) => {
            let summary = dataset.summary();
            let leagues: String = summary
                .popular_leagues
                .iter()
                .take(10)
                .map(|l| format!("<li>{} &mdash; {} matches</li>", l.league, l.count))
                .collect();
            format!(
                "<p>{} matches loaded, {} live.</p><h2>Popular leagues</h2><ul>{}</ul>",
                summary.total_matches, summary.live_matches, leagues
            )
        }
        None => "<p>No data loaded. POST /api/fetch-live to pull the feed.</p>".to_string(),
    };

    Html(format!(
        "<!DOCTYPE html><html><head><title>betfeed</title></head>\
         <body><h1>Line feed dashboard</h1>{}</body></html>",
        body
    ))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let guard = state.dataset.read().await;

    Json(json!({
        "service": "betfeed",
        "status": "ok",
        "has_data": guard.is_some(),
        "matches_loaded": guard.as_ref().map(|d| d.len()).unwrap_or(0),
    }))
}

pub async fn summary(State(state): State<AppState>) -> Result<Json<DatasetSummary>, ApiError> {
    let guard = state.dataset.read().await;
    let dataset = guard.as_ref().ok_or_else(no_data)?;

    Ok(Json(dataset.summary()))
}

pub async fn matches(
    State(state): State<AppState>,
    Query(filter): Query<MatchFilter>,
) -> Result<Json<Vec<Match>>, ApiError> {
    let guard = state.dataset.read().await;
    let dataset = guard.as_ref().ok_or_else(no_data)?;

    let mut selected: Vec<&Match> = match &filter.sport {
        Some(sport) => dataset.by_sport(sport),
        None => dataset.matches().iter().collect(),
    };

    if filter.live_only {
        selected.retain(|m| m.is_live);
    }

    if let Some(min_odds) = filter.min_odds {
        selected.retain(|m| m.markets.any_result_at_least(min_odds));
    }

    selected.truncate(filter.limit.unwrap_or(100));

    Ok(Json(selected.into_iter().cloned().collect()))
}

pub async fn match_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Match>, ApiError> {
    let guard = state.dataset.read().await;
    let dataset = guard.as_ref().ok_or_else(no_data)?;

    match dataset.find_by_id(id) {
        Some(m) => Ok(Json(m.clone())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Match not found" })),
        )),
    }
}

pub async fn leagues(State(state): State<AppState>) -> Result<Json<Vec<LeagueCount>>, ApiError> {
    let guard = state.dataset.read().await;
    let dataset = guard.as_ref().ok_or_else(no_data)?;

    Ok(Json(dataset.league_summary()))
}

/// Fetch from the vendor, snapshot the raw response, normalize, and swap
/// the current dataset.
pub async fn fetch_live(
    State(state): State<AppState>,
    Query(overrides): Query<FetchQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut params = state.config.fetch_params();
    if let Some(sports) = overrides.sports {
        params.sports = sports;
    }
    if let Some(count) = overrides.count {
        params.count = count;
    }

    let raw = match state.client.fetch_line(&params).await {
        Ok(raw) => raw,
        Err(e) => {
            error!("Live fetch failed: {}", e);
            return Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "detail": "Failed to fetch live data" })),
            ));
        }
    };

    let saved_to = match storage::save_response(&state.config.data_dir, &raw) {
        Ok(path) => Some(path.display().to_string()),
        Err(e) => {
            warn!("Could not save raw response: {:#}", e);
            None
        }
    };

    let envelope = match FeedEnvelope::from_value(&raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!("Feed envelope decode failed: {}", e);
            return Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "detail": "Failed to fetch live data" })),
            ));
        }
    };

    if !envelope.success {
        warn!(
            "Feed reported failure: code {} {}",
            envelope.error_code, envelope.error
        );
    }

    let batch = normalize_batch(&envelope.records);
    let fetched = batch.dataset.len();
    let skipped = batch.skipped.len();

    *state.dataset.write().await = Some(batch.dataset);

    info!("Live fetch complete: {} matches ({} skipped)", fetched, skipped);

    Ok(Json(json!({
        "success": true,
        "matches_fetched": fetched,
        "records_skipped": skipped,
        "saved_to": saved_to,
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

pub async fn export_csv(
    State(state): State<AppState>,
) -> Result<([(HeaderName, String); 2], Vec<u8>), ApiError> {
    let guard = state.dataset.read().await;
    let dataset = guard.as_ref().ok_or_else(no_data)?;

    let path = storage::export_csv(&state.config.data_dir, dataset).map_err(export_failed)?;
    attachment(&path, "text/csv").await
}

pub async fn export_json(
    State(state): State<AppState>,
) -> Result<([(HeaderName, String); 2], Vec<u8>), ApiError> {
    let guard = state.dataset.read().await;
    let dataset = guard.as_ref().ok_or_else(no_data)?;

    let path = storage::export_json(&state.config.data_dir, dataset).map_err(export_failed)?;
    attachment(&path, "application/json").await
}

fn export_failed(err: anyhow::Error) -> ApiError {
    error!("Export failed: {:#}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "Export failed" })),
    )
}

/// Serve a freshly written export file as a download.
async fn attachment(
    path: &FilePath,
    content_type: &'static str,
) -> Result<([(HeaderName, String); 2], Vec<u8>), ApiError> {
    let body = tokio::fs::read(path)
        .await
        .map_err(|e| export_failed(anyhow::Error::new(e).context("Failed to read export file")))?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("export");

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}
