//! Keyword frequency aggregation across a set of updates.

use indexmap::IndexMap;
use serde::Serialize;

use crate::constants::analytics::AVG_CONTRIBUTION_DECIMALS;
use crate::data::{Keyword, TrendLevel, UpdateRecord};
use crate::utils::round_to;

/// How often a keyword appeared and how strongly it contributed.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeywordFrequency {
    /// Keyword text.
    pub keyword: Keyword,
    /// Number of `top_keywords` entries naming this keyword.
    pub frequency: usize,
    /// Mean contribution rounded to two decimals, halves away from zero.
    pub avg_contribution: f64,
    /// Highest trend level seen for this keyword.
    pub trend_level: TrendLevel,
}

struct KeywordTally {
    count: usize,
    total_contribution: f64,
    max_trend_level: TrendLevel,
}

/// Aggregate every `top_keywords` entry in `updates` by keyword.
///
/// Output is sorted by descending frequency. Equal frequencies keep the order
/// in which the keywords first appear in `updates`.
pub fn keyword_frequency(updates: &[UpdateRecord]) -> Vec<KeywordFrequency> {
    let mut tallies: IndexMap<&str, KeywordTally> = IndexMap::new();
    for update in updates {
        for entry in &update.top_keywords {
            tallies
                .entry(entry.keyword.as_str())
                .and_modify(|tally| {
                    tally.count += 1;
                    tally.total_contribution += entry.contribution;
                    tally.max_trend_level = tally.max_trend_level.higher(entry.trend_level);
                })
                .or_insert(KeywordTally {
                    count: 1,
                    total_contribution: entry.contribution,
                    max_trend_level: entry.trend_level,
                });
        }
    }

    let mut frequencies: Vec<KeywordFrequency> = tallies
        .into_iter()
        .map(|(keyword, tally)| KeywordFrequency {
            keyword: keyword.to_string(),
            frequency: tally.count,
            avg_contribution: round_to(
                tally.total_contribution / tally.count as f64,
                AVG_CONTRIBUTION_DECIMALS,
            ),
            trend_level: tally.max_trend_level,
        })
        .collect();
    // Stable sort keeps first-appearance order among equal counts.
    frequencies.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    frequencies
}
