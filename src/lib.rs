#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Issue index analytics engine over the merged update timeline.
pub mod analytics;
/// Chart plot points and segment/node classification.
pub mod chart;
/// Analytics configuration types.
pub mod config;
/// Centralized constants used across analytics, chart, and feed loading.
pub mod constants;
/// Update record types and feed validation.
pub mod data;
/// Reusable report runner shared by the demo binary.
pub mod example_apps;
/// Keyword frequency aggregation.
pub mod keywords;
/// Statistics and trend classification.
pub mod metrics;
/// Rolling period windows.
pub mod period;
/// Update feed traits and built-in sources.
pub mod source;
/// Surge and drop detection.
pub mod surge;
/// Shared type aliases.
pub mod types;
/// Numeric rounding helpers.
pub mod utils;

mod errors;

pub use analytics::IssueIndexAnalytics;
pub use chart::{ChartPoint, NodeEmphasis, ScoreRange, SegmentSlope};
pub use config::{AnalyticsConfig, DateCollisionPolicy};
pub use data::{KeywordEntry, TrendDirection, TrendLevel, UpdateRecord, UpdateType};
pub use errors::IssueIndexError;
pub use keywords::KeywordFrequency;
pub use metrics::{ScoreMark, Statistics, Trend, calculate_trend};
pub use period::Period;
pub use source::{InMemoryUpdateSource, JsonFileSource, UpdateFeed, UpdateSource};
pub use surge::{SurgeEvent, SurgeKind};
pub use types::{DateString, Keyword, Percentage, Score, StreamId};
