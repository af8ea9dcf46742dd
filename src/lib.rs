mod error;
mod frames;
mod grid_data;
mod pipeline;
mod plot;
mod types;

pub use error::GridClimError;
pub use pipeline::*;

pub use types::location::{LatLon, NamedLocation};
pub use types::variable::{ClimateVariable, UnitConversion, VariableSource};

pub use frames::climatology_frame::{ClimatologyFrame, PeriodKey};
pub use frames::daily_frame::{DailyFrame, KELVIN_OFFSET};
pub use frames::monthly_frame::{MonthlyAggregation, MonthlyClimatology, MonthlyFrame};

pub use grid_data::dataset::GridDataset;
pub use grid_data::error::GridDataError;
pub use grid_data::select::{nearest_index, PointSeries};

pub use plot::error::PlotError;
pub use plot::render::{
    climatology_chart, climatology_with_envelope, daily_timeseries, ensure_output_dir,
    monthly_timeseries,
};
