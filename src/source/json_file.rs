use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::IssueIndexError;
use crate::source::{UpdateFeed, UpdateSource};

/// Source reading the regular and emergency feeds from two JSON files.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    id: String,
    regular_path: PathBuf,
    emergency_path: PathBuf,
}

impl JsonFileSource {
    /// Create a source for the given feed files.
    pub fn new(regular_path: impl Into<PathBuf>, emergency_path: impl Into<PathBuf>) -> Self {
        let regular_path = regular_path.into();
        Self {
            id: regular_path.display().to_string(),
            regular_path,
            emergency_path: emergency_path.into(),
        }
    }

    /// Override the id used in log lines.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Path of the regular feed file.
    pub fn regular_path(&self) -> &Path {
        &self.regular_path
    }

    /// Path of the emergency feed file.
    pub fn emergency_path(&self) -> &Path {
        &self.emergency_path
    }
}

impl UpdateSource for JsonFileSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<UpdateFeed, IssueIndexError> {
        info!(
            "[issue_index:json] loading feeds regular={} emergency={}",
            self.regular_path.display(),
            self.emergency_path.display()
        );
        let regular = fs::read_to_string(&self.regular_path)?;
        let emergency = fs::read_to_string(&self.emergency_path)?;
        UpdateFeed::parse_with_origins(
            &regular,
            &self.regular_path.display().to_string(),
            &emergency,
            &self.emergency_path.display().to_string(),
        )
    }
}
