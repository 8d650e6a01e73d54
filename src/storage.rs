use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use crate::feed::Dataset;
use crate::models::Match;

const SAMPLE_FILE: &str = "sample_data.json";

/// Create the data directory and a skeleton sample file on first run.
pub fn bootstrap(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    let sample_path = data_dir.join(SAMPLE_FILE);
    if !sample_path.exists() {
        let skeleton = json!({
            "Error": "",
            "ErrorCode": 0,
            "Success": true,
            "Value": []
        });
        fs::write(&sample_path, serde_json::to_string_pretty(&skeleton)?)
            .context("Failed to write sample data skeleton")?;
        info!("Created sample data skeleton at {}", sample_path.display());
    }

    Ok(())
}

/// Load the on-disk sample response, if one is there.
pub fn load_sample(data_dir: &Path) -> Result<Option<Value>> {
    let path = data_dir.join(SAMPLE_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).context("Failed to read sample data")?;
    let raw = serde_json::from_str(&content).context("Failed to parse sample data")?;
    Ok(Some(raw))
}

/// Persist a fetched raw response verbatim as a timestamped snapshot.
pub fn save_response(data_dir: &Path, raw: &Value) -> Result<PathBuf> {
    let path = data_dir.join(format!(
        "api_response_{}.json",
        Utc::now().format("%Y%m%d_%H%M%S")
    ));
    fs::write(&path, serde_json::to_string_pretty(raw)?)
        .context("Failed to save API response")?;
    Ok(path)
}

/// Write the flattened one-row-per-match CSV export.
pub fn export_csv(data_dir: &Path, dataset: &Dataset) -> Result<PathBuf> {
    let path = data_dir.join(format!(
        "matches_{}.csv",
        Utc::now().format("%Y%m%d_%H%M%S")
    ));

    let mut writer = csv::Writer::from_path(&path).context("Failed to create CSV export")?;

    writer.write_record([
        "Match",
        "Sport",
        "League",
        "Country",
        "Start Time",
        "Home Team",
        "Away Team",
        "Home Win Odds",
        "Draw Odds",
        "Away Win Odds",
        "Venue",
        "Is Live",
    ])?;

    for m in dataset.matches() {
        writer.write_record(csv_row(m))?;
    }

    writer.flush().context("Failed to flush CSV export")?;
    Ok(path)
}

/// Write the full dataset serialization as a timestamped JSON export.
pub fn export_json(data_dir: &Path, dataset: &Dataset) -> Result<PathBuf> {
    let path = data_dir.join(format!(
        "matches_{}.json",
        Utc::now().format("%Y%m%d_%H%M%S")
    ));
    fs::write(&path, serde_json::to_string_pretty(&dataset.export())?)
        .context("Failed to write JSON export")?;
    Ok(path)
}

/// One CSV row per match, with the 1X2 odds pulled out into columns.
fn csv_row(m: &Match) -> Vec<String> {
    let result_odds = |outcome: i64| {
        m.markets
            .match_result
            .iter()
            .find(|mk| mk.outcome == outcome)
            .map(|mk| mk.odds.to_string())
            .unwrap_or_default()
    };

    vec![
        m.name.clone(),
        m.sport.clone(),
        m.league.clone(),
        m.country.clone(),
        m.start_time.to_rfc3339(),
        m.home_team.name.clone(),
        m.away_team.name.clone(),
        result_odds(1),
        result_odds(2),
        result_odds(3),
        m.venue.clone().unwrap_or_default(),
        m.is_live.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::models::{Market, MarketSet, Team};

    fn fixture() -> Match {
        let mut markets = MarketSet::default();
        for (outcome, odds) in [(1, 1.8), (2, 3.2), (3, 4.5)] {
            markets.push(Market {
                market_type: 1,
                outcome,
                odds,
                parameter: None,
                is_main: outcome == 1,
            });
        }

        Match {
            id: 1,
            name: "A vs B".to_string(),
            sport: "Football".to_string(),
            league: "Premier".to_string(),
            country: "UK".to_string(),
            start_time: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            home_team: Team {
                name: "A".to_string(),
                id: 10,
                image: None,
                country: None,
            },
            away_team: Team {
                name: "B".to_string(),
                id: 20,
                image: None,
                country: None,
            },
            venue: Some("Wembley".to_string()),
            stage: None,
            probabilities: None,
            markets,
            weather: None,
            is_live: true,
            event_count: 0,
        }
    }

    #[test]
    fn test_csv_row_extracts_result_odds() {
        let row = csv_row(&fixture());

        assert_eq!(row[0], "A vs B");
        assert_eq!(row[7], "1.8");
        assert_eq!(row[8], "3.2");
        assert_eq!(row[9], "4.5");
        assert_eq!(row[10], "Wembley");
        assert_eq!(row[11], "true");
    }

    #[test]
    fn test_csv_row_leaves_missing_odds_blank() {
        let mut m = fixture();
        m.markets.match_result.retain(|mk| mk.outcome == 1);
        m.venue = None;

        let row = csv_row(&m);
        assert_eq!(row[7], "1.8");
        assert_eq!(row[8], "");
        assert_eq!(row[9], "");
        assert_eq!(row[10], "");
    }
}
