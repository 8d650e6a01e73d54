pub mod line_feed;

pub use line_feed::{FeedEnvelope, FetchError, FetchParams, LineFeedClient};
