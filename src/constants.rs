/// Constants used by the analytics engine.
pub mod analytics {
    /// Minimum absolute `comparison_percentage` reported as a surge or drop.
    pub const DEFAULT_SURGE_THRESHOLD: f64 = 15.0;
    /// Number of most recent updates voted on when classifying the trend.
    pub const TREND_WINDOW: usize = 5;
    /// Smallest trend window that still contains one consecutive pair.
    pub const MIN_TREND_WINDOW: usize = 2;
    /// Decimal places kept for the average score.
    pub const AVG_SCORE_DECIMALS: i32 = 1;
    /// Decimal places kept for the average keyword contribution.
    pub const AVG_CONTRIBUTION_DECIMALS: i32 = 2;
}

/// Constants used by chart classification.
pub mod chart {
    /// Relative slope above which a segment is a steep rise (and, negated, a gentle fall floor).
    pub const STEEP_SLOPE: f64 = 0.15;
    /// Relative slope above which a segment is a rise (and, negated, the flat floor).
    pub const MODERATE_SLOPE: f64 = 0.05;
}

/// Constants used by feed loading.
pub mod feed {
    /// Stream id used in validation errors for regular updates.
    pub const REGULAR_STREAM: &str = "regular";
    /// Stream id used in validation errors for emergency updates.
    pub const EMERGENCY_STREAM: &str = "emergency";
    /// Calendar date format used by `index_date`.
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
}

/// Constants used by period selection.
pub mod period {
    /// Calendar months covered by the `3months` window.
    pub const THREE_MONTHS: u32 = 3;
    /// Calendar months covered by the `6months` window.
    pub const SIX_MONTHS: u32 = 6;
    /// Calendar months covered by the `1year` window.
    pub const ONE_YEAR_MONTHS: u32 = 12;
}
