use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::MarketSet;

/// One side of a fixture, decoded from the vendor's paired `O1*`/`O2*` keys
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Display name
    pub name: String,

    /// Vendor team id
    pub id: i64,

    /// First entry of the vendor's image path list, if any
    pub image: Option<String>,

    /// Vendor country code
    pub country: Option<i64>,
}

/// Vendor-supplied win probabilities for the 1X2 outcomes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinProbabilities {
    pub home_win: Option<f64>,
    pub draw: Option<f64>,
    pub away_win: Option<f64>,
}

/// Pitch-side conditions from the vendor's misc-info list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Weather {
    pub temperature: Option<String>,
    pub condition: Option<String>,
    pub humidity: Option<String>,
    pub wind_speed: Option<String>,
    pub pressure: Option<String>,
    pub precipitation: Option<String>,
}

impl Weather {
    /// True when no field was populated
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.condition.is_none()
            && self.humidity.is_none()
            && self.wind_speed.is_none()
            && self.pressure.is_none()
            && self.precipitation.is_none()
    }
}

/// A normalized fixture with its market partition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Vendor match id
    pub id: i64,

    /// Fixture name (e.g. "A vs B")
    pub name: String,

    pub sport: String,
    pub league: String,
    pub country: String,

    /// Scheduled kick-off. Falls back to normalization time when the feed
    /// carries no epoch for the fixture.
    pub start_time: DateTime<Utc>,

    pub home_team: Team,
    pub away_team: Team,

    pub venue: Option<String>,
    pub stage: Option<String>,

    /// Present only when the record carries the probability sub-object
    pub probabilities: Option<WinProbabilities>,

    pub markets: MarketSet,

    pub weather: Option<Weather>,

    /// Derived from the vendor status code
    pub is_live: bool,

    /// Number of side events the vendor attaches to the fixture
    pub event_count: i64,
}
