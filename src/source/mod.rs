//! Input feeds for the analytics engine.
//!
//! Ownership model:
//! - `UpdateSource` is the engine-facing interface that yields a validated feed.
//! - `UpdateFeed` owns the two record collections; the engine takes it by value
//!   and never mutates it afterwards.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::constants::feed::{EMERGENCY_STREAM, REGULAR_STREAM};
use crate::data::{RawUpdateRecord, UpdateRecord};
use crate::errors::IssueIndexError;

/// JSON file backed source.
pub mod json_file;

pub use json_file::JsonFileSource;

/// The two input streams. Engine construction rechecks their numeric fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateFeed {
    /// Scheduled weekly updates, in feed order.
    pub regular: Vec<UpdateRecord>,
    /// Out-of-cycle updates, in feed order.
    pub emergency: Vec<UpdateRecord>,
}

#[derive(Deserialize)]
struct RegularFeedFile {
    regular_updates: Vec<RawUpdateRecord>,
}

#[derive(Deserialize)]
struct EmergencyFeedFile {
    emergency_updates: Vec<RawUpdateRecord>,
}

impl UpdateFeed {
    /// Build a feed from prebuilt records.
    pub fn new(regular: Vec<UpdateRecord>, emergency: Vec<UpdateRecord>) -> Self {
        Self { regular, emergency }
    }

    /// Parse and validate the `{"regular_updates": [...]}` and
    /// `{"emergency_updates": [...]}` documents.
    pub fn from_json_strs(regular: &str, emergency: &str) -> Result<Self, IssueIndexError> {
        Self::parse_with_origins(regular, REGULAR_STREAM, emergency, EMERGENCY_STREAM)
    }

    pub(crate) fn parse_with_origins(
        regular: &str,
        regular_origin: &str,
        emergency: &str,
        emergency_origin: &str,
    ) -> Result<Self, IssueIndexError> {
        let regular_file: RegularFeedFile =
            serde_json::from_str(regular).map_err(|source| IssueIndexError::Parse {
                origin: regular_origin.to_string(),
                source,
            })?;
        let emergency_file: EmergencyFeedFile =
            serde_json::from_str(emergency).map_err(|source| IssueIndexError::Parse {
                origin: emergency_origin.to_string(),
                source,
            })?;

        let feed = Self {
            regular: validate_stream(regular_file.regular_updates, REGULAR_STREAM)?,
            emergency: validate_stream(emergency_file.emergency_updates, EMERGENCY_STREAM)?,
        };
        info!(
            "[issue_index:source] feed parsed (regular={}, emergency={})",
            feed.regular.len(),
            feed.emergency.len()
        );
        Ok(feed)
    }

    /// Total number of records across both streams.
    pub fn len(&self) -> usize {
        self.regular.len() + self.emergency.len()
    }

    /// Whether both streams are empty.
    pub fn is_empty(&self) -> bool {
        self.regular.is_empty() && self.emergency.is_empty()
    }
}

fn validate_stream(
    raw: Vec<RawUpdateRecord>,
    stream: &str,
) -> Result<Vec<UpdateRecord>, IssueIndexError> {
    raw.into_iter()
        .enumerate()
        .map(|(position, record)| record.validate(stream, position))
        .collect()
}

/// Engine-facing feed provider.
///
/// A source is read once when the engine is built; refreshing data means
/// building a new engine from a new `load` call.
pub trait UpdateSource: Send + Sync {
    /// Stable identifier used in log lines.
    fn id(&self) -> &str;
    /// Produce the validated regular and emergency streams.
    fn load(&self) -> Result<UpdateFeed, IssueIndexError>;
}

/// Source backed by records already in memory.
pub struct InMemoryUpdateSource {
    id: String,
    feed: Arc<UpdateFeed>,
}

impl InMemoryUpdateSource {
    /// Create an in-memory source from prebuilt records.
    pub fn new(
        id: impl Into<String>,
        regular: Vec<UpdateRecord>,
        emergency: Vec<UpdateRecord>,
    ) -> Self {
        Self {
            id: id.into(),
            feed: Arc::new(UpdateFeed::new(regular, emergency)),
        }
    }
}

impl UpdateSource for InMemoryUpdateSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<UpdateFeed, IssueIndexError> {
        Ok((*self.feed).clone())
    }
}
