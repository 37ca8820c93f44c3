use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::chart::ChartPoint;
use crate::config::{AnalyticsConfig, DateCollisionPolicy};
use crate::constants::feed::{DATE_FORMAT, EMERGENCY_STREAM, REGULAR_STREAM};
use crate::data::UpdateRecord;
use crate::errors::IssueIndexError;
use crate::keywords::{KeywordFrequency, keyword_frequency};
use crate::metrics::{Statistics, Trend, calculate_trend_with_window, compute_statistics};
use crate::period::Period;
use crate::source::{UpdateFeed, UpdateSource};
use crate::surge::{SurgeEvent, detect_surges};

/// Read-only analytics over the merged regular + emergency timeline.
///
/// Built once from a feed and shared by reference; every query is a pure
/// function of the feed, the config, and (for period queries) the reference date.
#[derive(Clone, Debug)]
pub struct IssueIndexAnalytics {
    config: AnalyticsConfig,
    regular: Vec<UpdateRecord>,
    emergency: Vec<UpdateRecord>,
    timeline: Vec<UpdateRecord>,
}

impl IssueIndexAnalytics {
    /// Build an engine with the default configuration.
    pub fn new(feed: UpdateFeed) -> Result<Self, IssueIndexError> {
        Self::with_config(feed, AnalyticsConfig::default())
    }

    /// Build an engine from the feed returned by `source`.
    pub fn from_source(
        source: &dyn UpdateSource,
        config: AnalyticsConfig,
    ) -> Result<Self, IssueIndexError> {
        let feed = source.load()?;
        info!(
            "[issue_index:analytics] source '{}' loaded {} updates",
            source.id(),
            feed.len()
        );
        Self::with_config(feed, config)
    }

    /// Build an engine, merging both streams into one date-ordered timeline.
    ///
    /// The merge is regular-then-emergency followed by a stable sort on
    /// `index_date`, so same-date updates keep that source order.
    /// Records with NaN or infinite numbers are rejected whichever source built them.
    pub fn with_config(
        feed: UpdateFeed,
        config: AnalyticsConfig,
    ) -> Result<Self, IssueIndexError> {
        config.validate()?;
        let UpdateFeed { regular, emergency } = feed;
        for (stream, updates) in [(REGULAR_STREAM, &regular), (EMERGENCY_STREAM, &emergency)] {
            for (position, update) in updates.iter().enumerate() {
                update.check_finite(stream, position)?;
            }
        }

        let mut timeline = Vec::with_capacity(regular.len() + emergency.len());
        timeline.extend(regular.iter().cloned());
        timeline.extend(emergency.iter().cloned());
        timeline.sort_by_key(|update| update.index_date);

        for date in colliding_dates(&timeline) {
            match config.collision_policy {
                DateCollisionPolicy::Reject => {
                    return Err(IssueIndexError::DateCollision { date });
                }
                DateCollisionPolicy::Permit => warn!(
                    "[issue_index:analytics] multiple updates share index_date {}; keeping all",
                    date
                ),
            }
        }

        debug!(
            "[issue_index:analytics] timeline ready (regular={}, emergency={}, total={})",
            regular.len(),
            emergency.len(),
            timeline.len()
        );
        Ok(Self {
            config,
            regular,
            emergency,
            timeline,
        })
    }

    /// Configuration the engine was built with.
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Every update from both streams, ascending by `index_date`.
    pub fn all_updates(&self) -> &[UpdateRecord] {
        &self.timeline
    }

    /// Regular stream in feed order.
    pub fn regular_updates(&self) -> &[UpdateRecord] {
        &self.regular
    }

    /// Emergency stream in feed order.
    pub fn emergency_updates(&self) -> &[UpdateRecord] {
        &self.emergency
    }

    /// Last update of the merged timeline.
    pub fn latest_update(&self) -> Option<&UpdateRecord> {
        self.timeline.last()
    }

    /// Updates inside `period`, evaluated against today's local date.
    pub fn updates_by_period(&self, period: Period) -> &[UpdateRecord] {
        self.updates_by_period_as_of(period, today())
    }

    /// Updates dated on or after `period`'s cutoff from `today`, in timeline order.
    pub fn updates_by_period_as_of(&self, period: Period, today: NaiveDate) -> &[UpdateRecord] {
        match period.cutoff(today) {
            // The timeline is sorted, so the window is always a suffix.
            Some(cutoff) => {
                let start = self
                    .timeline
                    .partition_point(|update| update.index_date < cutoff);
                &self.timeline[start..]
            }
            // `All`, or a cutoff before the representable calendar.
            None => &self.timeline,
        }
    }

    /// First update dated `date` (`YYYY-MM-DD`); unparseable input finds nothing.
    pub fn update_by_date(&self, date: &str) -> Option<&UpdateRecord> {
        match NaiveDate::parse_from_str(date, DATE_FORMAT) {
            Ok(date) => self.update_on(date),
            Err(err) => {
                debug!(
                    "[issue_index:analytics] lookup date '{}' is not a calendar date: {}",
                    date, err
                );
                None
            }
        }
    }

    /// First update in timeline order dated `date`.
    pub fn update_on(&self, date: NaiveDate) -> Option<&UpdateRecord> {
        self.timeline.iter().find(|update| update.index_date == date)
    }

    /// Plot points for `period`, evaluated against today's local date.
    pub fn chart_data(&self, period: Period) -> Vec<ChartPoint> {
        self.chart_data_as_of(period, today())
    }

    /// Plot points for `period` evaluated on `today`.
    pub fn chart_data_as_of(&self, period: Period, today: NaiveDate) -> Vec<ChartPoint> {
        self.updates_by_period_as_of(period, today)
            .iter()
            .map(ChartPoint::from)
            .collect()
    }

    /// Threshold-crossing updates in `updates` (default: the whole timeline)
    /// using `threshold` (default: the configured surge threshold).
    pub fn detect_surge_periods(
        &self,
        updates: Option<&[UpdateRecord]>,
        threshold: Option<f64>,
    ) -> Vec<SurgeEvent> {
        detect_surges(
            updates.unwrap_or(&self.timeline),
            threshold.unwrap_or(self.config.surge_threshold),
        )
    }

    /// Statistics for `period`, evaluated against today's local date.
    pub fn statistics(&self, period: Period) -> Option<Statistics> {
        self.statistics_as_of(period, today())
    }

    /// Statistics for `period` evaluated on `today`; `None` when the window is empty.
    pub fn statistics_as_of(&self, period: Period, today: NaiveDate) -> Option<Statistics> {
        compute_statistics(
            self.updates_by_period_as_of(period, today),
            period,
            self.config.trend_window,
        )
    }

    /// Trend of `updates` over the configured recent window.
    pub fn calculate_trend(&self, updates: &[UpdateRecord]) -> Trend {
        calculate_trend_with_window(updates, self.config.trend_window)
    }

    /// Keyword frequencies for `period`, evaluated against today's local date.
    pub fn keyword_frequency(&self, period: Period) -> Vec<KeywordFrequency> {
        self.keyword_frequency_as_of(period, today())
    }

    /// Keyword frequencies for `period` evaluated on `today`.
    pub fn keyword_frequency_as_of(
        &self,
        period: Period,
        today: NaiveDate,
    ) -> Vec<KeywordFrequency> {
        keyword_frequency(self.updates_by_period_as_of(period, today))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Distinct dates held by more than one update of a sorted timeline.
fn colliding_dates(timeline: &[UpdateRecord]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = Vec::new();
    for pair in timeline.windows(2) {
        let date = pair[1].index_date;
        if pair[0].index_date == date && dates.last() != Some(&date) {
            dates.push(date);
        }
    }
    dates
}
