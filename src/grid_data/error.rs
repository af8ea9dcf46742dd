use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridDataError {
    #[error("Failed to open NetCDF file '{0}'")]
    FileOpen(PathBuf, #[source] netcdf::Error),

    #[error("Variable '{variable}' not found in '{path}'")]
    VariableNotFound { variable: String, path: PathBuf },

    #[error("Coordinate variable '{coordinate}' not found in '{path}'")]
    CoordinateNotFound { coordinate: String, path: PathBuf },

    #[error("Variable '{variable}' in '{path}' has {found} dimensions, expected 3 (time, lat, lon)")]
    DimensionCount {
        variable: String,
        path: PathBuf,
        found: usize,
    },

    #[error("Could not identify a {role} dimension among {names:?} in '{path}'")]
    DimensionNotIdentified {
        role: &'static str,
        names: Vec<String>,
        path: PathBuf,
    },

    #[error("Failed to read '{name}' from '{path}'")]
    VariableRead {
        name: String,
        path: PathBuf,
        #[source]
        source: netcdf::Error,
    },

    #[error("Time coordinate in '{0}' has no 'units' attribute")]
    TimeUnitsMissing(PathBuf),

    #[error("Unsupported time units '{0}', expected '<unit> since <epoch>'")]
    TimeUnitsUnsupported(String),

    #[error("Could not parse time epoch '{0}'")]
    TimeEpochParse(String),

    #[error("Coordinate axis '{0}' is empty")]
    EmptyAxis(String),

    #[error("Time axis has {times} entries but variable extent is {extent}")]
    TimeLengthMismatch { times: usize, extent: usize },

    #[error("Failed building series table: {0}")]
    DataFrame(#[from] PolarsError),
}
