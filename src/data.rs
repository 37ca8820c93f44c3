use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::feed::DATE_FORMAT;
use crate::errors::IssueIndexError;

pub use crate::types::{DateString, Keyword, Percentage, Score};

/// Source-supplied week-over-week direction of a single update.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// Score went up.
    Up,
    /// Score went down.
    Down,
}

impl TrendDirection {
    /// Parse the feed key (`up` / `down`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }

    /// Feed key for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Which computation cadence produced an update.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    /// Scheduled weekly computation.
    Regular,
    /// Out-of-cycle computation triggered by a significant event.
    Emergency,
}

impl UpdateType {
    /// Parse the feed key (`regular` / `emergency`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "regular" => Some(Self::Regular),
            "emergency" => Some(Self::Emergency),
            _ => None,
        }
    }

    /// Feed key for this update type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Emergency => "emergency",
        }
    }
}

/// Qualitative contribution intensity of a keyword.
///
/// Variants are declared in ascending rank so the derived `Ord` matches
/// `very_high > high > medium > low`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrendLevel {
    /// `low`
    Low,
    /// `medium`
    Medium,
    /// `high`
    High,
    /// `very_high`
    VeryHigh,
}

impl TrendLevel {
    /// Parse the feed key (`very_high` / `high` / `medium` / `low`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "very_high" => Some(Self::VeryHigh),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Feed key for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryHigh => "very_high",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Numeric rank: `very_high` = 4 down to `low` = 1.
    pub fn rank(&self) -> u8 {
        match self {
            Self::VeryHigh => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    /// Return the higher-ranked level; ties keep `self`.
    pub fn higher(self, other: TrendLevel) -> TrendLevel {
        if self >= other { self } else { other }
    }
}

/// One keyword contribution inside an update.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KeywordEntry {
    /// Keyword text.
    pub keyword: Keyword,
    /// Share of the update's score attributed to this keyword, in `[0, 1]`.
    pub contribution: f64,
    /// How strongly the keyword is trending.
    pub trend_level: TrendLevel,
}

/// One entry in the issue index timeline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UpdateRecord {
    /// Natural sort key of the merged timeline.
    pub index_date: NaiveDate,
    /// Index value for this update.
    pub current_score: Score,
    /// Signed percent change against the previous period, as supplied by the feed.
    pub comparison_percentage: Percentage,
    /// Direction reported by the feed.
    pub trend_direction: TrendDirection,
    /// Stream the update came from.
    pub update_type: UpdateType,
    /// Display summary of the period's dominant topic.
    pub main_keyword: String,
    /// Ranked keyword contributions.
    #[serde(default)]
    pub top_keywords: Vec<KeywordEntry>,
    /// Detail payload (articles, weight breakdown, notes) carried through untouched.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl UpdateRecord {
    /// `index_date` rendered in feed format.
    pub fn date_string(&self) -> DateString {
        self.index_date.format(DATE_FORMAT).to_string()
    }

    /// Reject NaN or infinite numbers; `stream` and `position` only label the error.
    pub(crate) fn check_finite(
        &self,
        stream: &str,
        position: usize,
    ) -> Result<(), IssueIndexError> {
        let invalid = |field: &'static str, reason: String| IssueIndexError::Validation {
            stream: stream.to_string(),
            position,
            field,
            reason,
        };
        if !self.current_score.is_finite() {
            return Err(invalid(
                "current_score",
                format!("score {} must be finite", self.current_score),
            ));
        }
        if !self.comparison_percentage.is_finite() {
            return Err(invalid(
                "comparison_percentage",
                format!("percentage {} must be finite", self.comparison_percentage),
            ));
        }
        if let Some(entry) = self
            .top_keywords
            .iter()
            .find(|entry| !entry.contribution.is_finite())
        {
            return Err(invalid(
                "contribution",
                format!("contribution for keyword '{}' must be finite", entry.keyword),
            ));
        }
        Ok(())
    }
}

/// Keyword entry exactly as it appears in a feed file, before validation.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RawKeywordEntry {
    keyword: Keyword,
    contribution: f64,
    trend_level: String,
}

/// Update exactly as it appears in a feed file, before validation.
///
/// Dates and enum fields stay as strings here so a bad value is reported
/// with its stream and position instead of as a bare JSON error.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RawUpdateRecord {
    index_date: String,
    current_score: Score,
    comparison_percentage: Percentage,
    trend_direction: String,
    update_type: String,
    main_keyword: String,
    #[serde(default)]
    top_keywords: Vec<RawKeywordEntry>,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

impl RawUpdateRecord {
    /// Validate into an `UpdateRecord`; `stream` and `position` only label errors.
    pub(crate) fn validate(
        self,
        stream: &str,
        position: usize,
    ) -> Result<UpdateRecord, IssueIndexError> {
        let invalid = |field: &'static str, reason: String| IssueIndexError::Validation {
            stream: stream.to_string(),
            position,
            field,
            reason,
        };

        let index_date = NaiveDate::parse_from_str(&self.index_date, DATE_FORMAT)
            .map_err(|err| invalid("index_date", format!("'{}': {}", self.index_date, err)))?;
        let trend_direction = TrendDirection::from_key(&self.trend_direction).ok_or_else(|| {
            invalid(
                "trend_direction",
                format!("unknown direction '{}'", self.trend_direction),
            )
        })?;
        let update_type = UpdateType::from_key(&self.update_type).ok_or_else(|| {
            invalid(
                "update_type",
                format!("unknown update type '{}'", self.update_type),
            )
        })?;

        let mut top_keywords = Vec::with_capacity(self.top_keywords.len());
        for entry in self.top_keywords {
            let trend_level = TrendLevel::from_key(&entry.trend_level).ok_or_else(|| {
                invalid(
                    "trend_level",
                    format!(
                        "unknown trend level '{}' for keyword '{}'",
                        entry.trend_level, entry.keyword
                    ),
                )
            })?;
            top_keywords.push(KeywordEntry {
                keyword: entry.keyword,
                contribution: entry.contribution,
                trend_level,
            });
        }

        let record = UpdateRecord {
            index_date,
            current_score: self.current_score,
            comparison_percentage: self.comparison_percentage,
            trend_direction,
            update_type,
            main_keyword: self.main_keyword,
            top_keywords,
            payload: self.payload,
        };
        record.check_finite(stream, position)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawUpdateRecord {
        serde_json::from_value(value).expect("raw record")
    }

    fn sample() -> Value {
        json!({
            "index_date": "2025-01-12",
            "current_score": 65,
            "comparison_percentage": 8.3,
            "trend_direction": "up",
            "update_type": "regular",
            "main_keyword": "AI chips",
            "top_keywords": [
                { "keyword": "AI chips", "contribution": 0.4, "trend_level": "very_high" },
                { "keyword": "export rules", "contribution": 0.2, "trend_level": "medium" }
            ],
            "update_time": "2025-01-12T09:00:00+09:00",
            "weight_breakdown": { "news_weight": { "score": 26 } }
        })
    }

    #[test]
    fn trend_level_order_matches_rank() {
        assert!(TrendLevel::VeryHigh > TrendLevel::High);
        assert!(TrendLevel::High > TrendLevel::Medium);
        assert!(TrendLevel::Medium > TrendLevel::Low);
        assert_eq!(TrendLevel::VeryHigh.rank(), 4);
        assert_eq!(TrendLevel::Low.rank(), 1);
    }

    #[test]
    fn higher_trend_level_keeps_running_value_on_tie() {
        assert_eq!(TrendLevel::High.higher(TrendLevel::Low), TrendLevel::High);
        assert_eq!(TrendLevel::Low.higher(TrendLevel::VeryHigh), TrendLevel::VeryHigh);
        assert_eq!(TrendLevel::Medium.higher(TrendLevel::Medium), TrendLevel::Medium);
    }

    #[test]
    fn validates_raw_record_and_keeps_payload() {
        let record = raw(sample()).validate("regular", 0).expect("valid record");
        assert_eq!(record.index_date, NaiveDate::from_ymd_opt(2025, 1, 12).unwrap());
        assert_eq!(record.current_score, 65.0);
        assert_eq!(record.trend_direction, TrendDirection::Up);
        assert_eq!(record.update_type, UpdateType::Regular);
        assert_eq!(record.top_keywords.len(), 2);
        assert_eq!(record.top_keywords[0].trend_level, TrendLevel::VeryHigh);
        assert_eq!(record.date_string(), "2025-01-12");
        assert_eq!(
            record.payload.get("update_time"),
            Some(&json!("2025-01-12T09:00:00+09:00"))
        );
        assert!(record.payload.contains_key("weight_breakdown"));
        assert!(!record.payload.contains_key("index_date"));
    }

    #[test]
    fn serialized_record_uses_feed_keys() {
        let record = raw(sample()).validate("regular", 0).expect("valid record");
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["index_date"], json!("2025-01-12"));
        assert_eq!(value["update_type"], json!("regular"));
        assert_eq!(value["top_keywords"][0]["trend_level"], json!("very_high"));
        assert_eq!(value["weight_breakdown"]["news_weight"]["score"], json!(26));
    }

    #[test]
    fn rejects_malformed_date() {
        let mut value = sample();
        value["index_date"] = json!("2025-13-01");
        let err = raw(value).validate("emergency", 3).unwrap_err();
        match err {
            IssueIndexError::Validation {
                stream,
                position,
                field,
                ..
            } => {
                assert_eq!(stream, "emergency");
                assert_eq!(position, 3);
                assert_eq!(field, "index_date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_unknown_enum_values() {
        let mut value = sample();
        value["update_type"] = json!("scheduled");
        let err = raw(value).validate("regular", 0).unwrap_err();
        assert!(err.to_string().contains("update_type"));

        let mut value = sample();
        value["trend_direction"] = json!("sideways");
        let err = raw(value).validate("regular", 0).unwrap_err();
        assert!(err.to_string().contains("trend_direction"));

        let mut value = sample();
        value["top_keywords"][1]["trend_level"] = json!("extreme");
        let err = raw(value).validate("regular", 1).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("trend_level"));
        assert!(message.contains("export rules"));
    }

    #[test]
    fn rejects_non_finite_numbers_on_typed_records() {
        let record = raw(sample()).validate("regular", 0).expect("valid record");
        assert!(record.check_finite("regular", 0).is_ok());

        let mut bad = record.clone();
        bad.current_score = f64::NAN;
        let err = bad.check_finite("regular", 4).unwrap_err();
        assert!(matches!(
            err,
            IssueIndexError::Validation { position: 4, field: "current_score", .. }
        ));

        let mut bad = record.clone();
        bad.comparison_percentage = f64::INFINITY;
        assert!(matches!(
            bad.check_finite("emergency", 0),
            Err(IssueIndexError::Validation { field: "comparison_percentage", .. })
        ));

        let mut bad = record;
        bad.top_keywords[1].contribution = f64::NEG_INFINITY;
        let message = bad.check_finite("regular", 0).unwrap_err().to_string();
        assert!(message.contains("export rules"));
    }
}
