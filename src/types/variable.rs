//! Defines the climate variables the pipeline understands and the
//! per-variable policy (unit conversion, monthly aggregation, labelling)
//! each one carries.

use crate::frames::monthly_frame::MonthlyAggregation;
use std::fmt;
use std::path::PathBuf;

/// The kind of climate variable held in a gridded dataset.
///
/// The kind decides how the variable is treated downstream: temperature is
/// converted from Kelvin to Celsius and averaged into monthly buckets,
/// precipitation keeps its native unit and is summed into monthly buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClimateVariable {
    /// Near-surface air temperature, stored in Kelvin by convention.
    Temperature,
    /// Daily precipitation totals in mm/day.
    Precipitation,
}

/// Whether values need a unit shift after extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitConversion {
    /// Subtract 273.15 from every value.
    KelvinToCelsius,
    /// Leave values untouched.
    None,
}

impl ClimateVariable {
    /// The unit shift applied to the combined daily table.
    pub fn unit_conversion(&self) -> UnitConversion {
        match self {
            ClimateVariable::Temperature => UnitConversion::KelvinToCelsius,
            ClimateVariable::Precipitation => UnitConversion::None,
        }
    }

    /// How daily values are folded into calendar-month buckets.
    ///
    /// Temperature averages over the month; precipitation accumulates.
    pub fn monthly_aggregation(&self) -> MonthlyAggregation {
        match self {
            ClimateVariable::Temperature => MonthlyAggregation::Mean,
            ClimateVariable::Precipitation => MonthlyAggregation::Sum,
        }
    }

    /// Short segment used in output file names (`tseries_<segment>_...`).
    pub(crate) fn file_segment(&self) -> &'static str {
        match self {
            ClimateVariable::Temperature => "temp",
            ClimateVariable::Precipitation => "prcp",
        }
    }

    /// Y-axis label for charts built from daily values.
    pub(crate) fn daily_axis_label(&self) -> &'static str {
        match self {
            ClimateVariable::Temperature => "Temperature (°C)",
            ClimateVariable::Precipitation => "Precipitation (mm/day)",
        }
    }

    /// Y-axis label for charts built from monthly buckets.
    pub(crate) fn monthly_axis_label(&self) -> &'static str {
        match self {
            ClimateVariable::Temperature => "Temperature (°C)",
            ClimateVariable::Precipitation => "Precipitation (mm/month)",
        }
    }
}

impl fmt::Display for ClimateVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClimateVariable::Temperature => write!(f, "temperature"),
            ClimateVariable::Precipitation => write!(f, "precipitation"),
        }
    }
}

/// Which NetCDF variable to read from which file, and how to treat it.
#[derive(Debug, Clone)]
pub struct VariableSource {
    /// Path to the NetCDF file.
    pub path: PathBuf,
    /// Name of the data variable inside the file (e.g. `T2M`).
    pub variable: String,
    /// Downstream treatment of the values.
    pub kind: ClimateVariable,
}

impl VariableSource {
    pub fn new(path: impl Into<PathBuf>, variable: impl Into<String>, kind: ClimateVariable) -> Self {
        Self {
            path: path.into(),
            variable: variable.into(),
            kind,
        }
    }
}
