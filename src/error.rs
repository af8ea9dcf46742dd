use crate::grid_data::error::GridDataError;
use crate::plot::error::PlotError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridClimError {
    #[error(transparent)]
    GridData(#[from] GridDataError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrame(#[from] PolarsError),

    #[error("At least one location is required to build a combined table")]
    NoLocations,
}
