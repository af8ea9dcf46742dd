//! The combined daily table: one time index, one column per location.

use crate::error::GridClimError;
use crate::frames::climatology_frame::{ClimatologyFrame, PeriodKey};
use crate::frames::monthly_frame::{MonthlyAggregation, MonthlyFrame};
use crate::grid_data::select::PointSeries;
use polars::prelude::*;

/// Offset between Kelvin and Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

/// A lazy daily table for one variable across all locations.
///
/// The `time` column is a date index; every other column is named after a
/// location. Per-location series are aligned by full outer join, so a
/// timestamp present in only one series shows up with nulls for the others.
#[derive(Clone)]
pub struct DailyFrame {
    pub frame: LazyFrame,
    locations: Vec<String>,
}

impl DailyFrame {
    /// Combines per-location series into one table aligned on `time`.
    ///
    /// # Errors
    ///
    /// Returns [`GridClimError::NoLocations`] for an empty input.
    pub fn from_point_series(series: Vec<PointSeries>) -> Result<DailyFrame, GridClimError> {
        let mut iter = series.into_iter();
        let first = iter.next().ok_or(GridClimError::NoLocations)?;

        let mut locations = vec![first.location];
        let mut frame = first
            .frame
            .lazy()
            .rename(["value"], [locations[0].as_str()], false);

        for s in iter {
            let rhs = s.frame.lazy().rename(["value"], [s.location.as_str()], false);
            let args = JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns);
            frame = frame.join(rhs, [col("time")], [col("time")], args);
            locations.push(s.location);
        }

        let frame = frame.sort(["time"], SortMultipleOptions::default());
        Ok(DailyFrame { frame, locations })
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Shifts every location column by exactly -273.15.
    pub fn kelvin_to_celsius(&self) -> DailyFrame {
        let exprs: Vec<Expr> = self
            .locations
            .iter()
            .map(|l| (col(l.as_str()) - lit(KELVIN_OFFSET)).alias(l.as_str()))
            .collect();
        DailyFrame {
            frame: self.frame.clone().with_columns(exprs),
            locations: self.locations.clone(),
        }
    }

    /// Arithmetic mean per calendar day of year (1..=366), per location.
    ///
    /// Day numbering follows the ordinal convention: Feb 29 is key 60 in
    /// leap years, so keys past 59 shift by one calendar day between leap
    /// and non-leap years, and key 366 appears only when observed.
    pub fn day_of_year_climatology(&self) -> ClimatologyFrame {
        let aggs: Vec<Expr> = self
            .locations
            .iter()
            .map(|l| col(l.as_str()).mean())
            .collect();
        let frame = self
            .frame
            .clone()
            .with_columns([col("time")
                .dt()
                .ordinal_day()
                .cast(DataType::Int32)
                .alias("doy")])
            .group_by([col("doy")])
            .agg(aggs)
            .sort(["doy"], SortMultipleOptions::default());
        ClimatologyFrame::new(frame, PeriodKey::DayOfYear, self.locations.clone())
    }

    /// Buckets daily values into calendar months.
    ///
    /// The chosen aggregation applies to every location column; the result
    /// keeps integer `year` and `month` key columns.
    pub fn resample_monthly(&self, aggregation: MonthlyAggregation) -> MonthlyFrame {
        let aggs: Vec<Expr> = self
            .locations
            .iter()
            .map(|l| match aggregation {
                MonthlyAggregation::Mean => col(l.as_str()).mean(),
                MonthlyAggregation::Sum => col(l.as_str()).sum(),
            })
            .collect();
        let frame = self
            .frame
            .clone()
            .with_columns([
                col("time").dt().year().cast(DataType::Int32).alias("year"),
                col("time").dt().month().cast(DataType::Int32).alias("month"),
            ])
            .group_by([col("year"), col("month")])
            .agg(aggs)
            .sort(["year", "month"], SortMultipleOptions::default());
        MonthlyFrame::new(frame, self.locations.clone())
    }
}
