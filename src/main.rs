//! Compares daily temperature and precipitation between Negombo and Jaffna
//! from two gridded datasets, writing the full chart set to `outputPlots/`.
//!
//! Everything is fixed: the inputs, the locations, the shared date window
//! and the output directory. Set `RUST_LOG=info` for progress output.

use chrono::NaiveDate;
use gridclim::{
    ClimatePipeline, ClimateVariable, GridClimError, LatLon, NamedLocation, VariableSource,
};
use std::path::Path;

const BASE_DIR: &str = "/data/course_climInfDis/projectExample";
const TEMP_FILE: &str = "MERRA2_tavg1_2d_slv_Nx.19800101_20211231.SUB.T2M.dly.nc";
const PRCP_FILE: &str = "mergedDly_2001_2020.nc";

fn main() -> Result<(), GridClimError> {
    env_logger::init();

    let raw_data = Path::new(BASE_DIR).join("rawData");

    // Shared window: latest start and earliest end across the two datasets.
    let start = NaiveDate::from_ymd_opt(2007, 1, 1).expect("valid date");
    let end = NaiveDate::from_ymd_opt(2020, 12, 31).expect("valid date");

    let pipeline = ClimatePipeline::builder()
        .temperature(VariableSource::new(
            raw_data.join(TEMP_FILE),
            "T2M",
            ClimateVariable::Temperature,
        ))
        .precipitation(VariableSource::new(
            raw_data.join(PRCP_FILE),
            "precipitationCal",
            ClimateVariable::Precipitation,
        ))
        .locations(vec![
            NamedLocation::new("Negombo", LatLon(7.2008, 79.8737)),
            NamedLocation::new("Jaffna", LatLon(9.6615, 80.0255)),
        ])
        .start(start)
        .end(end)
        .output_dir(Path::new(BASE_DIR).join("outputPlots"))
        .build();

    pipeline.run()
}
