//! Builds small synthetic NetCDF grids for tests.

use chrono::NaiveDate;
use std::path::Path;

pub(crate) struct FixtureSpec {
    pub variable: String,
    pub start: NaiveDate,
    pub n_days: usize,
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
    /// Cells written as the fill value, as (time, lat, lon) indices.
    pub fill_at: Vec<(usize, usize, usize)>,
    pub fill_value: Option<f64>,
}

impl Default for FixtureSpec {
    fn default() -> Self {
        FixtureSpec {
            variable: "T2M".to_string(),
            start: NaiveDate::from_ymd_opt(2007, 1, 1).unwrap(),
            n_days: 10,
            lats: vec![7.0, 7.5, 10.0],
            lons: vec![79.5, 80.0, 80.5],
            fill_at: vec![],
            fill_value: None,
        }
    }
}

/// Deterministic cell value so tests can predict what selection returns.
pub(crate) fn cell_value(t: usize, lat: usize, lon: usize) -> f64 {
    300.0 + t as f64 + 10.0 * lat as f64 + 100.0 * lon as f64
}

pub(crate) fn write_grid_file(path: &Path, spec: &FixtureSpec) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;

    file.add_dimension("time", spec.n_days)?;
    file.add_dimension("lat", spec.lats.len())?;
    file.add_dimension("lon", spec.lons.len())?;

    let mut time_var = file.add_variable::<f64>("time", &["time"])?;
    time_var.put_attribute(
        "units",
        format!("days since {}", spec.start.format("%Y-%m-%d")),
    )?;
    let offsets: Vec<f64> = (0..spec.n_days).map(|i| i as f64).collect();
    time_var.put_values(&offsets, ..)?;

    let mut lat_var = file.add_variable::<f64>("lat", &["lat"])?;
    lat_var.put_attribute("units", "degrees_north")?;
    lat_var.put_values(&spec.lats, ..)?;

    let mut lon_var = file.add_variable::<f64>("lon", &["lon"])?;
    lon_var.put_attribute("units", "degrees_east")?;
    lon_var.put_values(&spec.lons, ..)?;

    let mut data_var = file.add_variable::<f64>(&spec.variable, &["time", "lat", "lon"])?;
    if let Some(fill) = spec.fill_value {
        data_var.put_attribute("_FillValue", fill)?;
    }

    let mut data = Vec::with_capacity(spec.n_days * spec.lats.len() * spec.lons.len());
    for t in 0..spec.n_days {
        for la in 0..spec.lats.len() {
            for lo in 0..spec.lons.len() {
                let v = if spec.fill_at.contains(&(t, la, lo)) {
                    spec.fill_value.unwrap_or(f64::NAN)
                } else {
                    cell_value(t, la, lo)
                };
                data.push(v);
            }
        }
    }
    data_var.put_values(&data, ..)?;

    Ok(())
}
