//! The end-to-end comparison pipeline.
//!
//! Loads two gridded variables, extracts one daily series per location,
//! aligns them to a shared date window, derives climatologies and monthly
//! buckets, dumps the temperature tables to stdout and writes the full set
//! of comparison charts. Runs once, synchronously.

use crate::error::GridClimError;
use crate::frames::daily_frame::DailyFrame;
use crate::grid_data::dataset::GridDataset;
use crate::plot::render;
use crate::types::location::NamedLocation;
use crate::types::variable::{ClimateVariable, UnitConversion, VariableSource};
use bon::bon;
use chrono::NaiveDate;
use log::info;
use std::path::PathBuf;

/// A configured run over one temperature and one precipitation dataset.
///
/// Build with [`ClimatePipeline::builder()`], then call [`run`](Self::run).
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use gridclim::{ClimatePipeline, ClimateVariable, LatLon, NamedLocation, VariableSource};
///
/// # fn main() -> Result<(), gridclim::GridClimError> {
/// let pipeline = ClimatePipeline::builder()
///     .temperature(VariableSource::new(
///         "rawData/t2m.nc",
///         "T2M",
///         ClimateVariable::Temperature,
///     ))
///     .precipitation(VariableSource::new(
///         "rawData/prcp.nc",
///         "precipitationCal",
///         ClimateVariable::Precipitation,
///     ))
///     .locations(vec![NamedLocation::new("Negombo", LatLon(7.2008, 79.8737))])
///     .start(NaiveDate::from_ymd_opt(2007, 1, 1).unwrap())
///     .end(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap())
///     .output_dir("outputPlots".into())
///     .build();
/// pipeline.run()?;
/// # Ok(())
/// # }
/// ```
pub struct ClimatePipeline {
    temperature: VariableSource,
    precipitation: VariableSource,
    locations: Vec<NamedLocation>,
    start: NaiveDate,
    end: NaiveDate,
    output_dir: PathBuf,
}

#[bon]
impl ClimatePipeline {
    #[builder]
    pub fn new(
        temperature: VariableSource,
        precipitation: VariableSource,
        locations: Vec<NamedLocation>,
        start: NaiveDate,
        end: NaiveDate,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            temperature,
            precipitation,
            locations,
            start,
            end,
            output_dir,
        }
    }

    /// Runs the whole pipeline once.
    ///
    /// Any failure (unreadable file, missing variable, unwritable output
    /// directory) propagates; no stage is retried or skipped.
    pub fn run(&self) -> Result<(), GridClimError> {
        render::ensure_output_dir(&self.output_dir)?;
        info!(
            "Comparing {} locations over {}..{}, writing plots to {}",
            self.locations.len(),
            self.start,
            self.end,
            self.output_dir.display()
        );

        let temp = self.combined_daily(&self.temperature)?;
        let prcp = self.combined_daily(&self.precipitation)?;
        let locations = temp.locations().to_vec();
        let t_kind = self.temperature.kind;
        let p_kind = self.precipitation.kind;

        // Full daily record.
        let temp_daily = temp.frame.clone().collect()?;
        println!("{temp_daily}");
        render::daily_timeseries(
            &temp_daily,
            &locations,
            t_kind.daily_axis_label(),
            &self.artifact_path(t_kind, "dly_allTime"),
        )?;
        let prcp_daily = prcp.frame.clone().collect()?;
        render::daily_timeseries(
            &prcp_daily,
            &locations,
            p_kind.daily_axis_label(),
            &self.artifact_path(p_kind, "dly_allTime"),
        )?;

        // The full record hides the seasonality, so also chart the
        // day-of-year climatologies.
        let temp_clim = temp.day_of_year_climatology();
        let temp_clim_df = temp_clim.frame.clone().collect()?;
        println!("{temp_clim_df}");
        render::climatology_chart(
            &temp_clim_df,
            temp_clim.period(),
            &locations,
            t_kind.daily_axis_label(),
            &self.artifact_path(t_kind, "dlyClim"),
        )?;
        let prcp_clim = prcp.day_of_year_climatology();
        render::climatology_chart(
            &prcp_clim.frame.clone().collect()?,
            prcp_clim.period(),
            &locations,
            p_kind.daily_axis_label(),
            &self.artifact_path(p_kind, "dlyClim"),
        )?;

        // Monthly buckets: mean for temperature, sum for precipitation.
        let temp_monthly = temp.resample_monthly(t_kind.monthly_aggregation());
        let prcp_monthly = prcp.resample_monthly(p_kind.monthly_aggregation());
        let temp_monthly_df = temp_monthly.frame.clone().collect()?;
        println!("{temp_monthly_df}");
        render::monthly_timeseries(
            &temp_monthly_df,
            &locations,
            t_kind.monthly_axis_label(),
            &self.artifact_path(t_kind, "monthly_allTime"),
        )?;
        render::monthly_timeseries(
            &prcp_monthly.frame.clone().collect()?,
            &locations,
            p_kind.monthly_axis_label(),
            &self.artifact_path(p_kind, "monthly_allTime"),
        )?;

        // Monthly climatologies with their min-max envelope.
        let temp_mclim = temp_monthly.monthly_climatology();
        let temp_mean = temp_mclim.mean.frame.clone().collect()?;
        let temp_min = temp_mclim.min.frame.clone().collect()?;
        let temp_max = temp_mclim.max.frame.clone().collect()?;
        println!("{temp_mean}");
        println!("{temp_min}");
        println!("{temp_max}");
        render::climatology_with_envelope(
            &temp_mean,
            &temp_min,
            &temp_max,
            temp_mclim.mean.period(),
            &locations,
            t_kind.monthly_axis_label(),
            &self.artifact_path(t_kind, "monthlyClim_wShading"),
        )?;
        let prcp_mclim = prcp_monthly.monthly_climatology();
        render::climatology_with_envelope(
            &prcp_mclim.mean.frame.clone().collect()?,
            &prcp_mclim.min.frame.clone().collect()?,
            &prcp_mclim.max.frame.clone().collect()?,
            prcp_mclim.mean.period(),
            &locations,
            p_kind.monthly_axis_label(),
            &self.artifact_path(p_kind, "monthlyClim_wShading"),
        )?;

        info!("Pipeline finished");
        Ok(())
    }

    /// Loads one variable, extracts every location's series and combines
    /// them into the per-variable daily table, converting units if the
    /// variable asks for it.
    fn combined_daily(&self, source: &VariableSource) -> Result<DailyFrame, GridClimError> {
        let dataset = GridDataset::open(&source.path, &source.variable)?;
        let mut series = Vec::with_capacity(self.locations.len());
        for location in &self.locations {
            series.push(dataset.point_series(location, self.start, self.end)?);
        }
        let daily = DailyFrame::from_point_series(series)?;
        Ok(match source.kind.unit_conversion() {
            UnitConversion::KelvinToCelsius => daily.kelvin_to_celsius(),
            UnitConversion::None => daily,
        })
    }

    fn artifact_path(&self, kind: ClimateVariable, suffix: &str) -> PathBuf {
        self.output_dir
            .join(format!("tseries_{}_{}.png", kind.file_segment(), suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::monthly_frame::MonthlyAggregation;
    use crate::grid_data::test_fixtures::{write_grid_file, FixtureSpec};
    use crate::types::location::LatLon;
    use polars::prelude::DataFrame;
    use tempfile::tempdir;

    #[test]
    fn run_writes_all_eight_artifacts() {
        let dir = tempdir().unwrap();
        let temp_path = dir.path().join("t2m.nc");
        let prcp_path = dir.path().join("prcp.nc");
        let out_dir = dir.path().join("outputPlots");

        // ~2.5 months of synthetic daily data on a small grid.
        let temp_spec = FixtureSpec {
            n_days: 75,
            ..FixtureSpec::default()
        };
        let prcp_spec = FixtureSpec {
            variable: "precipitationCal".to_string(),
            n_days: 75,
            ..FixtureSpec::default()
        };
        write_grid_file(&temp_path, &temp_spec).unwrap();
        write_grid_file(&prcp_path, &prcp_spec).unwrap();

        let pipeline = ClimatePipeline::builder()
            .temperature(VariableSource::new(
                &temp_path,
                "T2M",
                ClimateVariable::Temperature,
            ))
            .precipitation(VariableSource::new(
                &prcp_path,
                "precipitationCal",
                ClimateVariable::Precipitation,
            ))
            .locations(vec![
                NamedLocation::new("Negombo", LatLon(7.2008, 79.8737)),
                NamedLocation::new("Jaffna", LatLon(9.6615, 80.0255)),
            ])
            .start(NaiveDate::from_ymd_opt(2007, 1, 1).unwrap())
            .end(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap())
            .output_dir(out_dir.clone())
            .build();

        pipeline.run().unwrap();

        for name in [
            "tseries_temp_dly_allTime",
            "tseries_prcp_dly_allTime",
            "tseries_temp_dlyClim",
            "tseries_prcp_dlyClim",
            "tseries_temp_monthly_allTime",
            "tseries_prcp_monthly_allTime",
            "tseries_temp_monthlyClim_wShading",
            "tseries_prcp_monthlyClim_wShading",
        ] {
            let path = out_dir.join(format!("{name}.png"));
            assert!(path.is_file(), "missing artifact {name}");
            assert!(path.metadata().unwrap().len() > 0);
        }
    }

    #[test]
    fn repeated_runs_produce_identical_tables() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t2m.nc");
        let spec = FixtureSpec {
            n_days: 75,
            ..FixtureSpec::default()
        };
        write_grid_file(&path, &spec).unwrap();

        let locations = [
            NamedLocation::new("Negombo", LatLon(7.2008, 79.8737)),
            NamedLocation::new("Jaffna", LatLon(9.6615, 80.0255)),
        ];
        let end = spec.start + chrono::Days::new(spec.n_days as u64 - 1);

        // Loads the file and derives every numeric table from scratch.
        let build = || -> Vec<DataFrame> {
            let dataset = GridDataset::open(&path, &spec.variable).unwrap();
            let series = locations
                .iter()
                .map(|l| dataset.point_series(l, spec.start, end).unwrap())
                .collect();
            let daily = DailyFrame::from_point_series(series)
                .unwrap()
                .kelvin_to_celsius();
            let monthly = daily.resample_monthly(MonthlyAggregation::Mean);
            let clim = monthly.monthly_climatology();
            vec![
                daily.frame.clone().collect().unwrap(),
                daily.day_of_year_climatology().frame.collect().unwrap(),
                monthly.frame.clone().collect().unwrap(),
                clim.mean.frame.collect().unwrap(),
                clim.min.frame.collect().unwrap(),
                clim.max.frame.collect().unwrap(),
            ]
        };

        let first = build();
        let second = build();
        for (a, b) in first.iter().zip(second.iter()) {
            assert!(a.equals_missing(b), "tables differ between runs:\n{a}\n{b}");
        }
    }
}
