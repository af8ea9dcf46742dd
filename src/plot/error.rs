use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Failed to create output directory '{0}'")]
    OutputDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Column '{0}' missing from plot data")]
    MissingColumn(String, #[source] PolarsError),

    #[error("Failed processing plot data: {0}")]
    DataFrame(#[from] PolarsError),

    #[error("No drawable values for '{0}'")]
    EmptySeries(PathBuf),

    #[error("Failed to render '{0}': {1}")]
    Render(PathBuf, String),
}
