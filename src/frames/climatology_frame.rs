//! Tables keyed by a repeating calendar period.

use polars::prelude::LazyFrame;

/// The cyclical key a climatology is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKey {
    /// Calendar day of year, 1..=366. Feb 29 is key 60 in leap years and
    /// 366 only occurs when a leap-year Dec 31 is in range.
    DayOfYear,
    /// Calendar month, 1..=12.
    Month,
}

impl PeriodKey {
    /// Name of the key column in the underlying frame.
    pub fn column(&self) -> &'static str {
        match self {
            PeriodKey::DayOfYear => "doy",
            PeriodKey::Month => "month",
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            PeriodKey::DayOfYear => "Day of Year",
            PeriodKey::Month => "Month",
        }
    }
}

/// A long-run statistic per period key, one column per location.
///
/// Built by [`crate::DailyFrame::day_of_year_climatology`] and
/// [`crate::MonthlyFrame::monthly_climatology`]; keys with zero observations
/// in range simply do not appear.
#[derive(Clone)]
pub struct ClimatologyFrame {
    pub frame: LazyFrame,
    period: PeriodKey,
    locations: Vec<String>,
}

impl ClimatologyFrame {
    pub(crate) fn new(frame: LazyFrame, period: PeriodKey, locations: Vec<String>) -> Self {
        Self {
            frame,
            period,
            locations,
        }
    }

    pub fn period(&self) -> PeriodKey {
        self.period
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }
}
