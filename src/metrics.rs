use serde::Serialize;

use crate::constants::analytics::{AVG_SCORE_DECIMALS, TREND_WINDOW};
use crate::data::{DateString, Score, UpdateRecord, UpdateType};
use crate::period::Period;
use crate::utils::{mean, round_to};

/// Direction of the recent score trend.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Most recent steps went up.
    Increasing,
    /// Most recent steps went down.
    Decreasing,
    /// No majority either way.
    Stable,
}

impl Trend {
    /// Lowercase label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

/// A score extreme together with the update that first reached it.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ScoreMark {
    /// Extreme score.
    pub score: Score,
    /// Date of the update that reached it.
    pub date: DateString,
    /// Main keyword of that update.
    pub keyword: String,
}

impl ScoreMark {
    fn from_update(update: &UpdateRecord) -> Self {
        Self {
            score: update.current_score,
            date: update.date_string(),
            keyword: update.main_keyword.clone(),
        }
    }
}

/// Aggregate statistics over one filtered period.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Period key the statistics cover.
    pub period: &'static str,
    /// Updates in the window.
    pub total_updates: usize,
    /// Regular updates in the window.
    pub regular_updates: usize,
    /// Emergency updates in the window.
    pub emergency_updates: usize,
    /// First update with the highest score.
    pub max_score: ScoreMark,
    /// First update with the lowest score.
    pub min_score: ScoreMark,
    /// Mean score rounded to one decimal, halves away from zero.
    pub avg_score: f64,
    /// Score of the last update in the filtered set.
    pub current_score: Score,
    /// Trend over the most recent updates.
    pub trend: Trend,
}

/// Classify the trend of `updates` using the default window of 5.
pub fn calculate_trend(updates: &[UpdateRecord]) -> Trend {
    calculate_trend_with_window(updates, TREND_WINDOW)
}

/// Majority vote over consecutive score changes in the last `window` updates.
///
/// Equal neighbours vote for neither side; a tied vote is `Stable`, as is any
/// input with fewer than two updates.
pub fn calculate_trend_with_window(updates: &[UpdateRecord], window: usize) -> Trend {
    if updates.len() < 2 {
        return Trend::Stable;
    }
    let recent = &updates[updates.len().saturating_sub(window)..];
    let mut increasing = 0usize;
    let mut decreasing = 0usize;
    for pair in recent.windows(2) {
        let (previous, current) = (pair[0].current_score, pair[1].current_score);
        if current > previous {
            increasing += 1;
        } else if current < previous {
            decreasing += 1;
        }
    }
    if increasing > decreasing {
        Trend::Increasing
    } else if decreasing > increasing {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

/// Compute statistics for an already filtered, date-ordered slice.
///
/// Returns `None` when `updates` is empty. Max and min report the first
/// update reaching the extreme.
pub fn compute_statistics(
    updates: &[UpdateRecord],
    period: Period,
    trend_window: usize,
) -> Option<Statistics> {
    let first = updates.first()?;
    let last = updates.last()?;

    let mut max_update = first;
    let mut min_update = first;
    for update in updates {
        if update.current_score > max_update.current_score {
            max_update = update;
        }
        if update.current_score < min_update.current_score {
            min_update = update;
        }
    }

    let scores: Vec<Score> = updates.iter().map(|u| u.current_score).collect();
    let avg_score = round_to(mean(&scores)?, AVG_SCORE_DECIMALS);
    let regular_updates = updates
        .iter()
        .filter(|u| u.update_type == UpdateType::Regular)
        .count();
    let emergency_updates = updates
        .iter()
        .filter(|u| u.update_type == UpdateType::Emergency)
        .count();

    Some(Statistics {
        period: period.as_str(),
        total_updates: updates.len(),
        regular_updates,
        emergency_updates,
        max_score: ScoreMark::from_update(max_update),
        min_score: ScoreMark::from_update(min_update),
        avg_score,
        current_score: last.current_score,
        trend: calculate_trend_with_window(updates, trend_window),
    })
}
