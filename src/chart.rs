//! Chart plot points and the display classification computed from them.
//!
//! Geometry and colors belong to the renderer; this module only decides which
//! bucket a segment or node falls into.

use serde::Serialize;

use crate::constants::chart::{MODERATE_SLOPE, STEEP_SLOPE};
use crate::data::{DateString, Percentage, Score, TrendDirection, UpdateRecord, UpdateType};

/// One plotted update.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Update date, `YYYY-MM-DD`.
    pub date: DateString,
    /// Plotted score.
    pub score: Score,
    /// Direction reported by the feed.
    pub trend: TrendDirection,
    /// Stream the update came from.
    pub update_type: UpdateType,
    /// Topic label shown on the node.
    pub main_keyword: String,
    /// Change against the previous period, in percent.
    pub comparison_percentage: Percentage,
}

impl From<&UpdateRecord> for ChartPoint {
    fn from(update: &UpdateRecord) -> Self {
        Self {
            date: update.date_string(),
            score: update.current_score,
            trend: update.trend_direction,
            update_type: update.update_type,
            main_keyword: update.main_keyword.clone(),
            comparison_percentage: update.comparison_percentage,
        }
    }
}

/// Bucket for the line segment ending at a point.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SegmentSlope {
    /// First point; nothing leads into it.
    Origin,
    /// Relative rise above the steep threshold.
    SteepRise,
    /// Relative rise above the moderate threshold.
    Rise,
    /// Any smaller rise.
    GentleRise,
    /// No rise, and a fall within the moderate threshold.
    Flat,
    /// Fall between the moderate and steep thresholds.
    GentleFall,
    /// Fall beyond the steep threshold.
    SteepFall,
}

/// Emphasis bucket for a plotted node.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeEmphasis {
    /// Emergency update.
    Emergency,
    /// Regular update that crossed the surge threshold.
    Surge,
    /// Everything else.
    Normal,
}

/// Lowest and highest plotted score.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct ScoreRange {
    /// Lowest score.
    pub min: Score,
    /// Highest score.
    pub max: Score,
}

impl ScoreRange {
    /// Distance between min and max, or 1 when every score is equal.
    pub fn span(&self) -> Score {
        let span = self.max - self.min;
        if span == 0.0 { 1.0 } else { span }
    }
}

/// Classify the relative change from `previous` to `current`.
///
/// A zero `previous` has no relative slope: 0 to 0 is flat, otherwise the sign
/// of `current` picks the steep bucket.
pub fn classify_slope(previous: Score, current: Score) -> SegmentSlope {
    if previous == 0.0 {
        return if current > 0.0 {
            SegmentSlope::SteepRise
        } else if current < 0.0 {
            SegmentSlope::SteepFall
        } else {
            SegmentSlope::Flat
        };
    }
    let slope = (current - previous) / previous;
    if slope > STEEP_SLOPE {
        SegmentSlope::SteepRise
    } else if slope > MODERATE_SLOPE {
        SegmentSlope::Rise
    } else if slope > 0.0 {
        SegmentSlope::GentleRise
    } else if slope > -MODERATE_SLOPE {
        SegmentSlope::Flat
    } else if slope > -STEEP_SLOPE {
        SegmentSlope::GentleFall
    } else {
        SegmentSlope::SteepFall
    }
}

/// One bucket per point; the first is always `Origin`.
pub fn classify_segments(points: &[ChartPoint]) -> Vec<SegmentSlope> {
    let mut slopes = Vec::with_capacity(points.len());
    if points.is_empty() {
        return slopes;
    }
    slopes.push(SegmentSlope::Origin);
    slopes.extend(
        points
            .windows(2)
            .map(|pair| classify_slope(pair[0].score, pair[1].score)),
    );
    slopes
}

/// Emergency updates win over surges; surges use the inclusive threshold.
pub fn node_emphasis(point: &ChartPoint, surge_threshold: f64) -> NodeEmphasis {
    if point.update_type == UpdateType::Emergency {
        NodeEmphasis::Emergency
    } else if point.comparison_percentage.abs() >= surge_threshold {
        NodeEmphasis::Surge
    } else {
        NodeEmphasis::Normal
    }
}

/// Score bounds of the plotted points, `None` when nothing is plotted.
pub fn score_range(points: &[ChartPoint]) -> Option<ScoreRange> {
    let first = points.first()?.score;
    Some(points.iter().fold(
        ScoreRange {
            min: first,
            max: first,
        },
        |range, point| ScoreRange {
            min: range.min.min(point.score),
            max: range.max.max(point.score),
        },
    ))
}
