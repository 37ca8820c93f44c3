use std::io;

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::StreamId;

/// Error type for feed loading, record validation, and configuration failures.
#[derive(Debug, Error)]
pub enum IssueIndexError {
    /// A feed record failed validation.
    #[error("invalid {field} in {stream} update #{position}: {reason}")]
    Validation {
        /// Stream the record came from.
        stream: StreamId,
        /// Zero-based position in that stream.
        position: usize,
        /// Offending field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// Two updates share a date under `DateCollisionPolicy::Reject`.
    #[error("more than one update is dated {date}")]
    DateCollision {
        /// The shared date.
        date: NaiveDate,
    },
    /// Invalid analytics configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Reading a feed failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A feed document is not valid JSON for its stream.
    #[error("could not parse update feed '{origin}': {source}")]
    Parse {
        /// File path or stream name of the document.
        origin: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}
