pub mod dataset;
pub mod normalize;
pub mod record;

pub use dataset::{Dataset, DatasetExport, DatasetSummary, LeagueCount, SportCount};
pub use normalize::{normalize_batch, normalize_match, NormalizedBatch, SkippedRecord};
pub use record::{RawRecord, RecordError};
