//! Calendar-month buckets and the statistics derived from them.

use crate::frames::climatology_frame::{ClimatologyFrame, PeriodKey};
use polars::prelude::*;

/// How daily values fold into a month bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyAggregation {
    Mean,
    Sum,
}

/// A lazy monthly table with integer `year` and `month` key columns and one
/// value column per location.
#[derive(Clone)]
pub struct MonthlyFrame {
    pub frame: LazyFrame,
    locations: Vec<String>,
}

/// Per-calendar-month statistics across all years in range.
pub struct MonthlyClimatology {
    pub mean: ClimatologyFrame,
    pub min: ClimatologyFrame,
    pub max: ClimatologyFrame,
}

impl MonthlyFrame {
    pub(crate) fn new(frame: LazyFrame, locations: Vec<String>) -> Self {
        Self { frame, locations }
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Mean, min and max per calendar month (1..=12) across all years.
    ///
    /// Months with no buckets in range are absent from the result.
    pub fn monthly_climatology(&self) -> MonthlyClimatology {
        MonthlyClimatology {
            mean: self.stat(|e| e.mean()),
            min: self.stat(|e| e.min()),
            max: self.stat(|e| e.max()),
        }
    }

    fn stat(&self, f: impl Fn(Expr) -> Expr) -> ClimatologyFrame {
        let aggs: Vec<Expr> = self.locations.iter().map(|l| f(col(l.as_str()))).collect();
        let frame = self
            .frame
            .clone()
            .group_by([col("month")])
            .agg(aggs)
            .sort(["month"], SortMultipleOptions::default());
        ClimatologyFrame::new(frame, PeriodKey::Month, self.locations.clone())
    }
}
