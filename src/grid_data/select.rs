//! Nearest-neighbor point extraction from a loaded grid.

use crate::grid_data::dataset::GridDataset;
use crate::grid_data::error::GridDataError;
use crate::types::location::NamedLocation;
use chrono::NaiveDate;
use log::debug;
use ndarray::Axis;
use ordered_float::OrderedFloat;
use polars::prelude::*;

/// The daily series of one variable at one location.
///
/// Holds a two-column table (`time`: date, `value`: float, nullable). The
/// grid cell coordinates deliberately do not travel with the result; only
/// the location's display name remains.
#[derive(Debug, Clone)]
pub struct PointSeries {
    pub location: String,
    pub frame: DataFrame,
}

/// Index of the axis value closest to `target`.
///
/// Equidistant candidates resolve to the lowest index; the axis need not be
/// sorted. Returns `None` for an empty axis.
pub fn nearest_index(axis: &[f64], target: f64) -> Option<usize> {
    axis.iter()
        .enumerate()
        .min_by_key(|(_, v)| OrderedFloat((**v - target).abs()))
        .map(|(i, _)| i)
}

impl GridDataset {
    /// Extracts the series at the grid cell nearest to `location`, restricted
    /// to `[start, end]` (both inclusive).
    ///
    /// Latitude and longitude are matched independently, each to its nearest
    /// axis value. Timestamps outside the window are excluded, not
    /// zero-filled. Values equal to the file's `_FillValue` (or NaN) become
    /// nulls.
    pub fn point_series(
        &self,
        location: &NamedLocation,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PointSeries, GridDataError> {
        let lat_idx = nearest_index(&self.lats, location.coordinate.0)
            .ok_or_else(|| GridDataError::EmptyAxis("lat".to_string()))?;
        let lon_idx = nearest_index(&self.lons, location.coordinate.1)
            .ok_or_else(|| GridDataError::EmptyAxis("lon".to_string()))?;

        debug!(
            "{}: ({}, {}) -> grid cell ({}, {}) in {}",
            location.name,
            location.coordinate.0,
            location.coordinate.1,
            self.lats[lat_idx],
            self.lons[lon_idx],
            self.path.display()
        );

        // Drop the higher axis first so the second index stays valid.
        let (first_axis, first_idx, second_axis, second_idx) = if self.lat_axis > self.lon_axis {
            (self.lat_axis, lat_idx, self.lon_axis, lon_idx)
        } else {
            (self.lon_axis, lon_idx, self.lat_axis, lat_idx)
        };
        let view = self.values.index_axis(Axis(first_axis), first_idx);
        let view = view.index_axis(Axis(second_axis), second_idx);

        let mut dates: Vec<NaiveDate> = Vec::new();
        let mut values: Vec<Option<f64>> = Vec::new();
        for (date, raw) in self.dates.iter().zip(view.iter()) {
            if *date < start || *date > end {
                continue;
            }
            let missing = raw.is_nan() || self.fill_value.is_some_and(|f| *raw == f);
            dates.push(*date);
            values.push(if missing { None } else { Some(*raw) });
        }

        let time = DateChunked::from_naive_date(PlSmallStr::from_static("time"), dates)
            .into_series();
        let frame = DataFrame::new(vec![
            Column::from(time),
            Column::new(PlSmallStr::from_static("value"), values),
        ])?;

        Ok(PointSeries {
            location: location.name.clone(),
            frame,
        })
    }
}
