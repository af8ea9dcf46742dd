//! In-memory handle to one gridded climate file.
//!
//! A [`GridDataset`] opens a NetCDF file, pulls one data variable plus its
//! coordinate axes fully into memory and decodes the CF-convention time axis
//! (`"<unit> since <epoch>"`) into calendar dates. Everything downstream
//! works on the decoded arrays; the file handle is dropped as soon as
//! loading finishes.

use crate::grid_data::error::GridDataError;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, info};
use ndarray::ArrayD;
use std::path::{Path, PathBuf};

/// One gridded time-series variable, fully loaded.
///
/// The variable must be three-dimensional over {time, latitude, longitude};
/// the dimension order inside the file does not matter, axes are identified
/// by name.
#[derive(Debug, Clone)]
pub struct GridDataset {
    pub(crate) path: PathBuf,
    pub(crate) lats: Vec<f64>,
    pub(crate) lons: Vec<f64>,
    pub(crate) dates: Vec<NaiveDate>,
    pub(crate) values: ArrayD<f64>,
    pub(crate) lat_axis: usize,
    pub(crate) lon_axis: usize,
    pub(crate) fill_value: Option<f64>,
}

/// Role a dimension plays for the variable, recognized by common CF names.
fn dimension_role(name: &str) -> Option<&'static str> {
    match name.to_ascii_lowercase().as_str() {
        "time" => Some("time"),
        "lat" | "latitude" => Some("lat"),
        "lon" | "longitude" => Some("lon"),
        _ => None,
    }
}

fn attribute_as_f64(value: netcdf::AttributeValue) -> Option<f64> {
    use netcdf::AttributeValue::*;
    match value {
        Uchar(v) => Some(v as f64),
        Schar(v) => Some(v as f64),
        Ushort(v) => Some(v as f64),
        Short(v) => Some(v as f64),
        Uint(v) => Some(v as f64),
        Int(v) => Some(v as f64),
        Ulonglong(v) => Some(v as f64),
        Longlong(v) => Some(v as f64),
        Float(v) => Some(v as f64),
        Double(v) => Some(v),
        _ => None,
    }
}

impl GridDataset {
    /// Opens `path` and loads `variable` together with its coordinate axes.
    ///
    /// # Errors
    ///
    /// Returns a [`GridDataError`] when the file cannot be opened, the
    /// variable or one of its coordinate variables is missing, the variable
    /// is not 3-D over {time, lat, lon}, or the time axis cannot be decoded.
    pub fn open(path: &Path, variable: &str) -> Result<GridDataset, GridDataError> {
        let file = netcdf::open(path)
            .map_err(|e| GridDataError::FileOpen(path.to_path_buf(), e))?;

        let var = file
            .variable(variable)
            .ok_or_else(|| GridDataError::VariableNotFound {
                variable: variable.to_string(),
                path: path.to_path_buf(),
            })?;

        let dim_names: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        if dim_names.len() != 3 {
            return Err(GridDataError::DimensionCount {
                variable: variable.to_string(),
                path: path.to_path_buf(),
                found: dim_names.len(),
            });
        }

        let axis_for = |role: &'static str| -> Result<usize, GridDataError> {
            dim_names
                .iter()
                .position(|n| dimension_role(n) == Some(role))
                .ok_or_else(|| GridDataError::DimensionNotIdentified {
                    role,
                    names: dim_names.clone(),
                    path: path.to_path_buf(),
                })
        };
        let time_axis = axis_for("time")?;
        let lat_axis = axis_for("lat")?;
        let lon_axis = axis_for("lon")?;

        let read_axis = |name: &str| -> Result<Vec<f64>, GridDataError> {
            let coord = file
                .variable(name)
                .ok_or_else(|| GridDataError::CoordinateNotFound {
                    coordinate: name.to_string(),
                    path: path.to_path_buf(),
                })?;
            let values = coord
                .get_values::<f64, _>(..)
                .map_err(|e| GridDataError::VariableRead {
                    name: name.to_string(),
                    path: path.to_path_buf(),
                    source: e,
                })?;
            if values.is_empty() {
                return Err(GridDataError::EmptyAxis(name.to_string()));
            }
            Ok(values)
        };

        let lats = read_axis(&dim_names[lat_axis])?;
        let lons = read_axis(&dim_names[lon_axis])?;
        let raw_time = read_axis(&dim_names[time_axis])?;

        let time_name = &dim_names[time_axis];
        let time_var = file
            .variable(time_name)
            .ok_or_else(|| GridDataError::CoordinateNotFound {
                coordinate: time_name.to_string(),
                path: path.to_path_buf(),
            })?;
        let units = time_var
            .attribute("units")
            .and_then(|a| a.value().ok())
            .and_then(|v| match v {
                netcdf::AttributeValue::Str(s) => Some(s),
                _ => None,
            })
            .ok_or_else(|| GridDataError::TimeUnitsMissing(path.to_path_buf()))?;
        let dates = decode_time_axis(&raw_time, &units)?;

        let values = var
            .get::<f64, _>(..)
            .map_err(|e| GridDataError::VariableRead {
                name: variable.to_string(),
                path: path.to_path_buf(),
                source: e,
            })?;

        if values.shape()[time_axis] != dates.len() {
            return Err(GridDataError::TimeLengthMismatch {
                times: dates.len(),
                extent: values.shape()[time_axis],
            });
        }

        let fill_value = var
            .attribute("_FillValue")
            .and_then(|a| a.value().ok())
            .and_then(attribute_as_f64);
        if let Some(fill) = fill_value {
            debug!("'{}' uses fill value {}", variable, fill);
        }

        info!(
            "Loaded '{}' from {}: {} timesteps, {}x{} grid",
            variable,
            path.display(),
            dates.len(),
            lats.len(),
            lons.len()
        );

        Ok(GridDataset {
            path: path.to_path_buf(),
            lats,
            lons,
            dates,
            values,
            lat_axis,
            lon_axis,
            fill_value,
        })
    }
}

/// Decodes a CF time axis into calendar dates.
///
/// `units` must have the form `"<unit> since <epoch>"` with a unit of days,
/// hours, minutes or seconds. Offsets are applied at second resolution and
/// truncated to the calendar date.
fn decode_time_axis(raw: &[f64], units: &str) -> Result<Vec<NaiveDate>, GridDataError> {
    let (unit, epoch_str) = units
        .split_once(" since ")
        .ok_or_else(|| GridDataError::TimeUnitsUnsupported(units.to_string()))?;

    let seconds_per_unit = match unit.trim().to_ascii_lowercase().as_str() {
        "days" | "day" => 86_400.0,
        "hours" | "hour" => 3_600.0,
        "minutes" | "minute" => 60.0,
        "seconds" | "second" => 1.0,
        _ => return Err(GridDataError::TimeUnitsUnsupported(units.to_string())),
    };

    let epoch = parse_epoch(epoch_str)?;
    Ok(raw
        .iter()
        .map(|v| {
            let offset = Duration::seconds((v * seconds_per_unit).round() as i64);
            (epoch + offset).date()
        })
        .collect())
}

fn parse_epoch(raw: &str) -> Result<NaiveDateTime, GridDataError> {
    let cleaned = raw.trim().trim_end_matches('Z').trim_end_matches(" UTC");

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(cleaned, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(GridDataError::TimeEpochParse(raw.to_string()))
}
