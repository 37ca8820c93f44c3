use serde::Serialize;

use crate::data::{DateString, Percentage, Score, UpdateRecord, UpdateType};

/// Direction of a threshold-crossing change.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SurgeKind {
    /// Positive change.
    Surge,
    /// Zero or negative change.
    Drop,
}

/// An update whose own `comparison_percentage` met the surge threshold.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurgeEvent {
    /// Update date, `YYYY-MM-DD`.
    pub date: DateString,
    /// Score of the update.
    pub score: Score,
    /// The `comparison_percentage` that crossed the threshold.
    pub change: Percentage,
    /// Surge or drop.
    #[serde(rename = "type")]
    pub kind: SurgeKind,
    /// Main keyword of the update.
    pub keyword: String,
    /// Stream the update came from.
    pub update_type: UpdateType,
}

/// Emit an event for every update with `|comparison_percentage| >= threshold`.
///
/// Only the stored percentage is inspected; neighbouring scores are not
/// compared. A positive change is a surge, anything else (zero included, which
/// only qualifies when `threshold` is 0) is a drop. Events keep input order.
pub fn detect_surges(updates: &[UpdateRecord], threshold: f64) -> Vec<SurgeEvent> {
    updates
        .iter()
        .filter(|update| update.comparison_percentage.abs() >= threshold)
        .map(|update| SurgeEvent {
            date: update.date_string(),
            score: update.current_score,
            change: update.comparison_percentage,
            kind: if update.comparison_percentage > 0.0 {
                SurgeKind::Surge
            } else {
                SurgeKind::Drop
            },
            keyword: update.main_keyword.clone(),
            update_type: update.update_type,
        })
        .collect()
}
