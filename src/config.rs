use crate::constants::analytics::{DEFAULT_SURGE_THRESHOLD, MIN_TREND_WINDOW, TREND_WINDOW};
use crate::errors::IssueIndexError;

/// What to do when two updates share an `index_date`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateCollisionPolicy {
    /// Keep every update; same-date entries stay in source order
    /// (regular stream first). A warning is logged per colliding date.
    #[default]
    Permit,
    /// Fail engine construction with `IssueIndexError::DateCollision`.
    Reject,
}

/// Tuning knobs for `IssueIndexAnalytics`.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyticsConfig {
    /// Minimum absolute `comparison_percentage` treated as a surge or drop.
    pub surge_threshold: f64,
    /// Number of most recent updates considered by trend classification.
    pub trend_window: usize,
    /// Handling of same-date updates across (or within) the two streams.
    pub collision_policy: DateCollisionPolicy,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            surge_threshold: DEFAULT_SURGE_THRESHOLD,
            trend_window: TREND_WINDOW,
            collision_policy: DateCollisionPolicy::Permit,
        }
    }
}

impl AnalyticsConfig {
    /// Override the surge threshold.
    pub fn with_surge_threshold(mut self, threshold: f64) -> Self {
        self.surge_threshold = threshold;
        self
    }

    /// Override the trend window size.
    pub fn with_trend_window(mut self, window: usize) -> Self {
        self.trend_window = window;
        self
    }

    /// Override the date collision policy.
    pub fn with_collision_policy(mut self, policy: DateCollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Check that thresholds and window sizes are usable.
    pub fn validate(&self) -> Result<(), IssueIndexError> {
        if !self.surge_threshold.is_finite() || self.surge_threshold < 0.0 {
            return Err(IssueIndexError::Configuration(format!(
                "surge_threshold must be a non-negative number, got {}",
                self.surge_threshold
            )));
        }
        if self.trend_window < MIN_TREND_WINDOW {
            return Err(IssueIndexError::Configuration(format!(
                "trend_window must be at least {}, got {}",
                MIN_TREND_WINDOW, self.trend_window
            )));
        }
        Ok(())
    }
}
