pub mod market;
pub mod matches;

pub use market::{Market, MarketCategory, MarketSet};
pub use matches::{Match, Team, Weather, WinProbabilities};
