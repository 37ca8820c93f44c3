use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use tracing::debug;

use crate::constants::period::{ONE_YEAR_MONTHS, SIX_MONTHS, THREE_MONTHS};

/// Rolling time window used to filter the timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Period {
    /// Last three calendar months (`3months`).
    #[default]
    ThreeMonths,
    /// Last six calendar months (`6months`).
    SixMonths,
    /// Last twelve calendar months (`1year`).
    OneYear,
    /// Whole timeline (`all`).
    All,
}

impl Period {
    /// Parse a period key. Unrecognized keys fall back to `ThreeMonths`.
    pub fn parse(key: &str) -> Self {
        match key {
            "3months" => Self::ThreeMonths,
            "6months" => Self::SixMonths,
            "1year" => Self::OneYear,
            "all" => Self::All,
            other => {
                debug!(
                    "[issue_index:period] unknown period '{}', using 3months",
                    other
                );
                Self::ThreeMonths
            }
        }
    }

    /// Period key as accepted by [`Period::parse`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThreeMonths => "3months",
            Self::SixMonths => "6months",
            Self::OneYear => "1year",
            Self::All => "all",
        }
    }

    /// Calendar months spanned by the window, `None` for `All`.
    pub fn months(&self) -> Option<u32> {
        match self {
            Self::ThreeMonths => Some(THREE_MONTHS),
            Self::SixMonths => Some(SIX_MONTHS),
            Self::OneYear => Some(ONE_YEAR_MONTHS),
            Self::All => None,
        }
    }

    /// Earliest date (inclusive) kept by this window when evaluated on `today`.
    ///
    /// Subtraction is calendar-aware. A day past the end of the target month
    /// rolls over into the following month, so May 31 minus 3 months is Mar 3
    /// and 2024-02-29 minus 1 year is 2023-03-01.
    /// Returns `None` for `All` and for dates before the representable range.
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        let months = self.months()?;
        // Day 1 exists in every month, so this subtraction never clamps.
        let month_start = today
            .with_day(1)?
            .checked_sub_months(Months::new(months))?;
        month_start.checked_add_days(Days::new(u64::from(today.day0())))
    }

    /// Whether `date` falls inside this window evaluated on `today`.
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.cutoff(today) {
            Some(cutoff) => date >= cutoff,
            None => true,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Period {
    fn from(value: &str) -> Self {
        Period::parse(value)
    }
}
