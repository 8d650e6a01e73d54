use serde_json::Value;
use tracing::warn;

use crate::feed::dataset::Dataset;
use crate::feed::record::{RawRecord, RecordError};
use crate::models::{Market, MarketSet, Match, Team, Weather, WinProbabilities};

/// A record that failed normalization, with the vendor id when one was present
#[derive(Debug)]
pub struct SkippedRecord {
    pub id: Option<i64>,
    pub reason: RecordError,
}

/// Outcome of normalizing one raw response's record array
#[derive(Debug)]
pub struct NormalizedBatch {
    pub dataset: Dataset,
    pub skipped: Vec<SkippedRecord>,
}

/// Normalize a whole record array. Bad records are logged and dropped; the
/// batch always runs to completion.
pub fn normalize_batch(records: &[Value]) -> NormalizedBatch {
    let mut matches = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for raw in records {
        match normalize_match(raw) {
            Ok(m) => matches.push(m),
            Err(reason) => {
                let id = raw.get("I").and_then(Value::as_i64);
                match id {
                    Some(id) => warn!("Skipping record {}: {}", id, reason),
                    None => warn!("Skipping record without id: {}", reason),
                }
                skipped.push(SkippedRecord { id, reason });
            }
        }
    }

    NormalizedBatch {
        dataset: Dataset::new(matches),
        skipped,
    }
}

/// Normalize a single raw vendor record into a `Match`.
///
/// The record id and both team names are structural; everything else decodes
/// with the field defaults.
pub fn normalize_match(raw: &Value) -> Result<Match, RecordError> {
    let record = RawRecord::new(raw)?;

    let id = record.require_int("I")?;
    let home_team = decode_team(&record, "O1", "O1I", "O1IMG", "O1C")?;
    let away_team = decode_team(&record, "O2", "O2I", "O2IMG", "O2C")?;

    // Venue and stage travel in an optional match-info sub-object
    let match_info = record.object("MIO");
    let venue = match_info.as_ref().and_then(|o| o.opt_text("Loc"));
    let stage = match_info.as_ref().and_then(|o| o.opt_text("TSt"));

    let probabilities = record.object("WP").map(|wp| WinProbabilities {
        home_win: wp.opt_float("P1"),
        draw: wp.opt_float("PX"),
        away_win: wp.opt_float("P2"),
    });

    let markets = decode_markets(&record)?;
    let weather = decode_weather(&record)?;

    Ok(Match {
        id,
        name: record.text("L"),
        sport: record.text("SE"),
        league: record.text("LE"),
        country: record.text("CN"),
        start_time: record.timestamp("S"),
        home_team,
        away_team,
        venue,
        stage,
        probabilities,
        markets,
        weather,
        is_live: record.int("SS") == 1,
        event_count: record.int("EC"),
    })
}

fn decode_team(
    record: &RawRecord,
    name_key: &'static str,
    id_key: &str,
    image_key: &str,
    country_key: &str,
) -> Result<Team, RecordError> {
    Ok(Team {
        name: record.require_text(name_key)?,
        id: record.int(id_key),
        image: record.first_text(image_key),
        country: record.opt_int(country_key),
    })
}

/// Primary markets arrive flat in `E`; additional lines arrive grouped in
/// `AE`, each group carrying the type code for its nested `ME` entries.
fn decode_markets(record: &RawRecord) -> Result<MarketSet, RecordError> {
    let mut markets = MarketSet::default();

    for entry in record.entries("E")? {
        markets.push(Market {
            market_type: entry.int("G"),
            outcome: entry.int("T"),
            odds: entry.float("C"),
            parameter: entry.opt_float("P"),
            is_main: entry.int("CE") == 1,
        });
    }

    for group in record.entries("AE")? {
        let group_type = group.int("G");
        for entry in group.entries("ME")? {
            markets.push(Market {
                market_type: group_type,
                outcome: entry.int("T"),
                odds: entry.float("C"),
                parameter: entry.opt_float("P"),
                is_main: false,
            });
        }
    }

    Ok(markets)
}

fn decode_weather(record: &RawRecord) -> Result<Option<Weather>, RecordError> {
    let mut weather = Weather::default();

    for item in record.entries("MIS")? {
        let value = item.opt_text("V");
        match item.int("K") {
            9 => weather.temperature = value,
            21 => weather.condition = value,
            27 => weather.humidity = value,
            23 => weather.wind_speed = value,
            25 => weather.pressure = value,
            35 => weather.precipitation = value,
            _ => {}
        }
    }

    Ok(if weather.is_empty() {
        None
    } else {
        Some(weather)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn live_record() -> Value {
        json!({
            "I": 1,
            "L": "A vs B",
            "SE": "Football",
            "LE": "Premier",
            "CN": "UK",
            "S": 1_700_000_000i64,
            "O1": "A",
            "O1I": 10,
            "O2": "B",
            "O2I": 20,
            "E": [
                { "G": 1, "T": 1, "C": 1.8 },
                { "G": 1, "T": 2, "C": 3.2 },
                { "G": 1, "T": 3, "C": 4.5 }
            ],
            "SS": 1
        })
    }

    #[test]
    fn test_live_record_normalizes_end_to_end() {
        let m = normalize_match(&live_record()).unwrap();

        assert_eq!(m.id, 1);
        assert_eq!(m.name, "A vs B");
        assert_eq!(m.sport, "Football");
        assert_eq!(m.league, "Premier");
        assert_eq!(m.country, "UK");
        assert_eq!(m.start_time.timestamp(), 1_700_000_000);
        assert_eq!(m.home_team.name, "A");
        assert_eq!(m.home_team.id, 10);
        assert_eq!(m.away_team.name, "B");
        assert_eq!(m.away_team.id, 20);
        assert!(m.is_live);

        assert_eq!(m.markets.match_result.len(), 3);
        assert!(m.markets.over_under.is_empty());
        assert!(m.markets.handicap.is_empty());
        assert!(m.markets.both_teams_score.is_empty());
        assert!(m.markets.correct_score.is_empty());

        let odds: Vec<(i64, f64)> = m
            .markets
            .match_result
            .iter()
            .map(|mk| (mk.outcome, mk.odds))
            .collect();
        assert_eq!(odds, vec![(1, 1.8), (2, 3.2), (3, 4.5)]);
    }

    #[test]
    fn test_missing_probability_object_yields_none() {
        let m = normalize_match(&live_record()).unwrap();
        assert!(m.probabilities.is_none());
    }

    #[test]
    fn test_probability_object_decodes_when_present() {
        let mut raw = live_record();
        raw["WP"] = json!({ "P1": 0.5, "P2": 0.3 });

        let m = normalize_match(&raw).unwrap();
        let probs = m.probabilities.unwrap();
        assert_eq!(probs.home_win, Some(0.5));
        assert_eq!(probs.draw, None);
        assert_eq!(probs.away_win, Some(0.3));
    }

    #[test]
    fn test_zero_epoch_falls_back_to_now() {
        let mut raw = live_record();
        raw["S"] = json!(0);

        let before = Utc::now();
        let m = normalize_match(&raw).unwrap();
        assert!(m.start_time >= before);
    }

    #[test]
    fn test_venue_and_stage_from_match_info() {
        let mut raw = live_record();
        raw["MIO"] = json!({ "Loc": "Wembley", "TSt": "Group A" });

        let m = normalize_match(&raw).unwrap();
        assert_eq!(m.venue, Some("Wembley".to_string()));
        assert_eq!(m.stage, Some("Group A".to_string()));

        let plain = normalize_match(&live_record()).unwrap();
        assert_eq!(plain.venue, None);
        assert_eq!(plain.stage, None);
    }

    #[test]
    fn test_additional_market_groups_flatten_with_group_type() {
        let mut raw = live_record();
        raw["AE"] = json!([
            {
                "G": 17,
                "ME": [
                    { "T": 7, "C": 1.9, "P": -1.5 },
                    { "T": 8, "C": 2.1, "P": 1.5 }
                ]
            },
            {
                "G": 19,
                "ME": [ { "T": 1, "C": 1.6 } ]
            }
        ]);

        let m = normalize_match(&raw).unwrap();
        assert_eq!(m.markets.handicap.len(), 2);
        assert_eq!(m.markets.handicap[0].market_type, 17);
        assert_eq!(m.markets.handicap[0].parameter, Some(-1.5));
        assert!(!m.markets.handicap[0].is_main);
        assert_eq!(m.markets.both_teams_score.len(), 1);
    }

    #[test]
    fn test_unrecognized_market_codes_are_dropped() {
        let mut raw = live_record();
        raw["E"] = json!([
            { "G": 1, "T": 1, "C": 1.8 },
            { "G": 99, "T": 1, "C": 5.0 }
        ]);

        let m = normalize_match(&raw).unwrap();
        assert_eq!(m.markets.len(), 1);
        assert_eq!(m.markets.match_result.len(), 1);
    }

    #[test]
    fn test_weather_key_table() {
        let mut raw = live_record();
        raw["MIS"] = json!([
            { "K": 9, "V": "24" },
            { "K": 21, "V": "Clear" },
            { "K": 27, "V": "60" },
            { "K": 23, "V": "12" },
            { "K": 25, "V": "1013" },
            { "K": 35, "V": "0" },
            { "K": 99, "V": "ignored" }
        ]);

        let m = normalize_match(&raw).unwrap();
        let weather = m.weather.unwrap();
        assert_eq!(weather.temperature, Some("24".to_string()));
        assert_eq!(weather.condition, Some("Clear".to_string()));
        assert_eq!(weather.humidity, Some("60".to_string()));
        assert_eq!(weather.wind_speed, Some("12".to_string()));
        assert_eq!(weather.pressure, Some("1013".to_string()));
        assert_eq!(weather.precipitation, Some("0".to_string()));
    }

    #[test]
    fn test_weather_absent_without_mapped_keys() {
        let mut raw = live_record();
        raw["MIS"] = json!([ { "K": 99, "V": "x" } ]);

        let m = normalize_match(&raw).unwrap();
        assert!(m.weather.is_none());

        let plain = normalize_match(&live_record()).unwrap();
        assert!(plain.weather.is_none());
    }

    #[test]
    fn test_missing_team_fields_fail_the_record() {
        let mut raw = live_record();
        raw.as_object_mut().unwrap().remove("O2");

        assert!(matches!(
            normalize_match(&raw),
            Err(RecordError::MissingField("O2"))
        ));
    }

    #[test]
    fn test_batch_skips_bad_record_and_continues() {
        let mut bad = live_record();
        bad["I"] = json!(2);
        bad.as_object_mut().unwrap().remove("O1");

        let records = vec![live_record(), bad];
        let batch = normalize_batch(&records);

        assert_eq!(batch.dataset.len(), 1);
        assert_eq!(batch.dataset.matches()[0].id, 1);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].id, Some(2));
        assert!(matches!(
            batch.skipped[0].reason,
            RecordError::MissingField("O1")
        ));
    }

    #[test]
    fn test_batch_skips_non_object_record() {
        let records = vec![json!("garbage"), live_record()];
        let batch = normalize_batch(&records);

        assert_eq!(batch.dataset.len(), 1);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].id, None);
    }

    #[test]
    fn test_malformed_markets_array_fails_the_record() {
        let mut raw = live_record();
        raw["E"] = json!("not an array");

        assert!(matches!(
            normalize_match(&raw),
            Err(RecordError::InvalidField("E"))
        ));
    }
}
