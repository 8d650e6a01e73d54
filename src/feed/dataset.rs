use serde::Serialize;

use crate::models::Match;

/// Per-league match count
#[derive(Debug, Clone, Serialize)]
pub struct LeagueCount {
    pub league: String,
    pub count: usize,
}

/// Per-sport match count
#[derive(Debug, Clone, Serialize)]
pub struct SportCount {
    pub sport: String,
    pub count: usize,
}

/// Headline numbers for the dashboard and summary endpoints
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub total_matches: usize,
    pub live_matches: usize,
    pub sports: Vec<SportCount>,
    pub popular_leagues: Vec<LeagueCount>,
}

/// Full serialization of a dataset for the JSON export
#[derive(Debug, Clone, Serialize)]
pub struct DatasetExport {
    pub total_matches: usize,
    pub live_matches: usize,
    pub sports: Vec<SportCount>,
    pub matches: Vec<Match>,
    pub popular_leagues: Vec<LeagueCount>,
}

/// The normalized matches of one fetch/load cycle, in feed order.
///
/// A new fetch replaces the whole dataset; nothing mutates one in place.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    matches: Vec<Match>,
}

impl Dataset {
    pub fn new(matches: Vec<Match>) -> Self {
        Self { matches }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Matches for one sport, compared case-insensitively.
    pub fn by_sport(&self, sport: &str) -> Vec<&Match> {
        let want = sport.to_lowercase();
        self.matches
            .iter()
            .filter(|m| m.sport.to_lowercase() == want)
            .collect()
    }

    pub fn live_only(&self) -> Vec<&Match> {
        self.matches.iter().filter(|m| m.is_live).collect()
    }

    /// Matches where any 1X2 line pays at least `threshold`.
    pub fn with_min_odds(&self, threshold: f64) -> Vec<&Match> {
        self.matches
            .iter()
            .filter(|m| m.markets.any_result_at_least(threshold))
            .collect()
    }

    /// First match with the given vendor id.
    pub fn find_by_id(&self, id: i64) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// League match counts, most active first. The sort is stable, so
    /// leagues with equal counts keep feed order.
    pub fn league_summary(&self) -> Vec<LeagueCount> {
        let mut counts: Vec<LeagueCount> = Vec::new();
        for m in &self.matches {
            match counts.iter_mut().find(|c| c.league == m.league) {
                Some(entry) => entry.count += 1,
                None => counts.push(LeagueCount {
                    league: m.league.clone(),
                    count: 1,
                }),
            }
        }
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }

    fn sport_summary(&self) -> Vec<SportCount> {
        let mut counts: Vec<SportCount> = Vec::new();
        for m in &self.matches {
            match counts.iter_mut().find(|c| c.sport == m.sport) {
                Some(entry) => entry.count += 1,
                None => counts.push(SportCount {
                    sport: m.sport.clone(),
                    count: 1,
                }),
            }
        }
        counts
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            total_matches: self.len(),
            live_matches: self.live_only().len(),
            sports: self.sport_summary(),
            popular_leagues: self.league_summary(),
        }
    }

    pub fn export(&self) -> DatasetExport {
        DatasetExport {
            total_matches: self.len(),
            live_matches: self.live_only().len(),
            sports: self.sport_summary(),
            matches: self.matches.clone(),
            popular_leagues: self.league_summary(),
        }
    }
}
