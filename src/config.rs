use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::api::FetchParams;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Sportsbook feed base URL
    pub feed_base_url: String,

    /// Default vendor sport id to request
    pub feed_sport: i64,

    /// Default number of records per fetch
    pub feed_count: u32,

    /// Feed language code
    pub feed_language: String,

    /// Vendor time-window filter
    pub feed_time_filter: i64,

    /// Vendor time-zone offset
    pub feed_time_zone: i64,

    /// Vendor feed mode
    pub feed_mode: i64,

    /// Vendor country code
    pub feed_country: i64,

    /// Vendor group id
    pub feed_group: i64,

    /// Port for the dashboard API
    pub http_port: u16,

    /// Directory for raw snapshots, sample data, and exports
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            feed_base_url: env::var("FEED_BASE_URL")
                .unwrap_or_else(|_| "https://1xbetbd.com".to_string()),

            feed_sport: env::var("FEED_SPORT")
                .unwrap_or_else(|_| "66".to_string())
                .parse()
                .context("FEED_SPORT must be a valid number")?,

            feed_count: env::var("FEED_COUNT")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .context("FEED_COUNT must be a valid number")?,

            feed_language: env::var("FEED_LANGUAGE").unwrap_or_else(|_| "en".to_string()),

            feed_time_filter: env::var("FEED_TIME_FILTER")
                .unwrap_or_else(|_| "2200000".to_string())
                .parse()
                .context("FEED_TIME_FILTER must be a valid number")?,

            feed_time_zone: env::var("FEED_TIME_ZONE")
                .unwrap_or_else(|_| "6".to_string())
                .parse()
                .context("FEED_TIME_ZONE must be a valid number")?,

            feed_mode: env::var("FEED_MODE")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .context("FEED_MODE must be a valid number")?,

            feed_country: env::var("FEED_COUNTRY")
                .unwrap_or_else(|_| "19".to_string())
                .parse()
                .context("FEED_COUNTRY must be a valid number")?,

            feed_group: env::var("FEED_GROUP")
                .unwrap_or_else(|_| "925".to_string())
                .parse()
                .context("FEED_GROUP must be a valid number")?,

            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("HTTP_PORT must be a valid port")?,

            data_dir: PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string())),
        })
    }

    /// Default request parameters for the line feed
    pub fn fetch_params(&self) -> FetchParams {
        FetchParams {
            sports: self.feed_sport,
            count: self.feed_count,
            language: self.feed_language.clone(),
            time_filter: self.feed_time_filter,
            time_zone: self.feed_time_zone,
            mode: self.feed_mode,
            country: self.feed_country,
            get_empty: true,
            group: self.feed_group,
        }
    }
}
