use serde::{Deserialize, Serialize};

/// One quoted price line for one outcome on one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Vendor market-type code (1 = 1X2, 2 = handicap, ...)
    #[serde(rename = "type")]
    pub market_type: i64,

    /// Vendor outcome code within the market type
    pub outcome: i64,

    /// Decimal odds
    pub odds: f64,

    /// Line parameter (handicap value, total, ...)
    pub parameter: Option<f64>,

    /// Whether the vendor flags this as the primary line
    pub is_main: bool,
}

/// Semantic bucket a vendor market-type code maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketCategory {
    MatchResult,
    OverUnder,
    Handicap,
    BothTeamsScore,
    CorrectScore,
}

impl MarketCategory {
    /// Map a vendor market-type code to its bucket.
    ///
    /// The numbering is the vendor's own. Codes outside this table carry
    /// markets we do not track and yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(MarketCategory::MatchResult),
            15 | 62 => Some(MarketCategory::OverUnder),
            2 | 17 => Some(MarketCategory::Handicap),
            19 => Some(MarketCategory::BothTeamsScore),
            8 => Some(MarketCategory::CorrectScore),
            _ => None,
        }
    }
}

/// Partition of a match's markets into the five tracked buckets.
///
/// Every market lands in at most one bucket; unrecognized type codes are
/// dropped on insert and retained nowhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSet {
    /// 1X2 odds
    pub match_result: Vec<Market>,
    /// Total goals
    pub over_under: Vec<Market>,
    /// Asian handicap
    pub handicap: Vec<Market>,
    /// Both teams to score
    pub both_teams_score: Vec<Market>,
    /// Correct score
    pub correct_score: Vec<Market>,
}

impl MarketSet {
    /// Route a market into its bucket by type code.
    pub fn push(&mut self, market: Market) {
        match MarketCategory::from_code(market.market_type) {
            Some(MarketCategory::MatchResult) => self.match_result.push(market),
            Some(MarketCategory::OverUnder) => self.over_under.push(market),
            Some(MarketCategory::Handicap) => self.handicap.push(market),
            Some(MarketCategory::BothTeamsScore) => self.both_teams_score.push(market),
            Some(MarketCategory::CorrectScore) => self.correct_score.push(market),
            None => {}
        }
    }

    /// Total markets across all buckets
    pub fn len(&self) -> usize {
        self.match_result.len()
            + self.over_under.len()
            + self.handicap.len()
            + self.both_teams_score.len()
            + self.correct_score.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when any 1X2 line pays at least `threshold`.
    pub fn any_result_at_least(&self, threshold: f64) -> bool {
        self.match_result.iter().any(|m| m.odds >= threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(market_type: i64) -> Market {
        Market {
            market_type,
            outcome: 1,
            odds: 2.0,
            parameter: None,
            is_main: false,
        }
    }

    #[test]
    fn test_classifier_table() {
        assert_eq!(MarketCategory::from_code(1), Some(MarketCategory::MatchResult));
        assert_eq!(MarketCategory::from_code(15), Some(MarketCategory::OverUnder));
        assert_eq!(MarketCategory::from_code(62), Some(MarketCategory::OverUnder));
        assert_eq!(MarketCategory::from_code(2), Some(MarketCategory::Handicap));
        assert_eq!(MarketCategory::from_code(17), Some(MarketCategory::Handicap));
        assert_eq!(MarketCategory::from_code(19), Some(MarketCategory::BothTeamsScore));
        assert_eq!(MarketCategory::from_code(8), Some(MarketCategory::CorrectScore));
    }

    #[test]
    fn test_unknown_codes_have_no_category() {
        for code in [0, 3, 7, 16, 18, 20, 63, 100, -1] {
            assert_eq!(MarketCategory::from_code(code), None, "code {}", code);
        }
    }

    #[test]
    fn test_push_routes_by_code() {
        let mut set = MarketSet::default();
        set.push(market(1));
        set.push(market(62));
        set.push(market(17));
        set.push(market(19));
        set.push(market(8));

        assert_eq!(set.match_result.len(), 1);
        assert_eq!(set.over_under.len(), 1);
        assert_eq!(set.handicap.len(), 1);
        assert_eq!(set.both_teams_score.len(), 1);
        assert_eq!(set.correct_score.len(), 1);
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_push_drops_unrecognized_codes() {
        let mut set = MarketSet::default();
        set.push(market(42));
        set.push(market(0));

        assert!(set.is_empty());
    }

    #[test]
    fn test_any_result_at_least() {
        let mut set = MarketSet::default();
        set.push(Market {
            market_type: 1,
            outcome: 1,
            odds: 1.8,
            parameter: None,
            is_main: true,
        });
        set.push(Market {
            market_type: 1,
            outcome: 2,
            odds: 3.2,
            parameter: None,
            is_main: false,
        });

        assert!(set.any_result_at_least(3.0));
        assert!(!set.any_result_at_least(3.5));
    }
}
