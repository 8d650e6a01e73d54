use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Why a feed fetch produced no data
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("feed returned status {0}")]
    Status(StatusCode),

    #[error("feed body is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Query parameters for one line-feed request
#[derive(Debug, Clone)]
pub struct FetchParams {
    /// Vendor sport id
    pub sports: i64,
    /// Number of records to request
    pub count: u32,
    /// Language code
    pub language: String,
    /// Time-window filter
    pub time_filter: i64,
    /// Time-zone offset
    pub time_zone: i64,
    /// Feed mode
    pub mode: i64,
    /// Country code
    pub country: i64,
    /// Include fixtures without quoted lines
    pub get_empty: bool,
    /// Group id
    pub group: i64,
}

/// Top-level feed envelope around the raw record array
#[derive(Debug, Deserialize)]
pub struct FeedEnvelope {
    #[serde(rename = "Error", default)]
    pub error: String,

    #[serde(rename = "ErrorCode", default)]
    pub error_code: i64,

    #[serde(rename = "Success", default)]
    pub success: bool,

    #[serde(rename = "Value", default)]
    pub records: Vec<Value>,
}

impl FeedEnvelope {
    pub fn from_value(raw: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(raw)
    }
}

/// Client for the sportsbook line feed
pub struct LineFeedClient {
    client: Client,
    base_url: String,
}

impl LineFeedClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one line-feed snapshot as raw JSON.
    ///
    /// Single attempt: any transport error, non-2xx status, or undecodable
    /// body comes back as a `FetchError` for the caller to render as
    /// "no data available".
    pub async fn fetch_line(&self, params: &FetchParams) -> Result<Value, FetchError> {
        let url = format!("{}/LineFeed/Get1x2_VZip", self.base_url);
        debug!(
            "Fetching line feed: {} (sport {}, count {})",
            url, params.sports, params.count
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("sports", params.sports.to_string()),
                ("count", params.count.to_string()),
                ("lng", params.language.clone()),
                ("tf", params.time_filter.to_string()),
                ("tz", params.time_zone.to_string()),
                ("mode", params.mode.to_string()),
                ("country", params.country.to_string()),
                ("getEmpty", params.get_empty.to_string()),
                ("gr", params.group.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Line feed error: {} - {}", status, text);
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(FetchError::Decode)
    }
}
