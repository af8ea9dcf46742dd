//! Renders the comparison charts to PNG files.
//!
//! Every chart draws one line per location from the fixed palette, labels
//! both axes, shows a legend and writes a 3000x1800 px bitmap (10x6 in at
//! 300 DPI). Existing files at the target path are overwritten.

use crate::frames::climatology_frame::PeriodKey;
use crate::plot::error::PlotError;
use crate::plot::style::{
    palette, AXIS_FONT, ENVELOPE_ALPHA, FIG_HEIGHT, FIG_WIDTH, LABEL_FONT, LINE_WIDTH,
};
use chrono::{Months, NaiveDate};
use log::info;
use plotters::prelude::*;
use plotters::style::FontTransform;
use polars::prelude::*;
use std::path::Path;

/// Creates the output directory if it does not exist yet.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PlotError> {
    if dir.is_dir() {
        return Ok(());
    }
    info!("Creating output directory {}", dir.display());
    std::fs::create_dir_all(dir).map_err(|e| PlotError::OutputDirCreation(dir.to_path_buf(), e))
}

/// Draws the full daily series for each location against the date axis.
pub fn daily_timeseries(
    df: &DataFrame,
    locations: &[String],
    y_desc: &str,
    path: &Path,
) -> Result<(), PlotError> {
    let xs = time_axis(df, path)?;
    let series = location_series(df, locations)?;
    render_date_lines(path, &xs, &series, "Date", y_desc)
}

/// Draws monthly buckets for each location against the date axis.
///
/// The integer `year`/`month` keys are positioned at the end of each month,
/// matching the month-end timestamps a daily-to-monthly resample produces.
pub fn monthly_timeseries(
    df: &DataFrame,
    locations: &[String],
    y_desc: &str,
    path: &Path,
) -> Result<(), PlotError> {
    let xs = month_axis(df, path)?;
    let series = location_series(df, locations)?;
    render_date_lines(path, &xs, &series, "Date", y_desc)
}

/// Draws a climatology keyed by day-of-year or month.
pub fn climatology_chart(
    df: &DataFrame,
    period: PeriodKey,
    locations: &[String],
    y_desc: &str,
    path: &Path,
) -> Result<(), PlotError> {
    let xs = key_axis(df, period.column())?;
    let series = location_series(df, locations)?;
    render_key_lines(path, &xs, &series, None, period.axis_label(), y_desc)
}

/// Draws a monthly climatology with a shaded min-max envelope per location.
pub fn climatology_with_envelope(
    mean_df: &DataFrame,
    min_df: &DataFrame,
    max_df: &DataFrame,
    period: PeriodKey,
    locations: &[String],
    y_desc: &str,
    path: &Path,
) -> Result<(), PlotError> {
    let xs = key_axis(mean_df, period.column())?;
    let series = location_series(mean_df, locations)?;
    let lo = location_series(min_df, locations)?;
    let hi = location_series(max_df, locations)?;
    render_key_lines(
        path,
        &xs,
        &series,
        Some((&lo, &hi)),
        period.axis_label(),
        y_desc,
    )
}

type NamedValues = (String, Vec<Option<f64>>);

fn location_series(df: &DataFrame, locations: &[String]) -> Result<Vec<NamedValues>, PlotError> {
    locations
        .iter()
        .map(|l| {
            let column = df
                .column(l.as_str())
                .map_err(|e| PlotError::MissingColumn(l.clone(), e))?;
            Ok((l.clone(), column.f64()?.iter().collect()))
        })
        .collect()
}

fn time_axis(df: &DataFrame, path: &Path) -> Result<Vec<NaiveDate>, PlotError> {
    let column = df
        .column("time")
        .map_err(|e| PlotError::MissingColumn("time".to_string(), e))?;
    // A null date cannot be positioned on the axis; erroring beats pairing
    // the remaining dates with the wrong values.
    column
        .as_materialized_series()
        .date()?
        .as_date_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| PlotError::EmptySeries(path.to_path_buf()))
}

fn key_axis(df: &DataFrame, name: &str) -> Result<Vec<i32>, PlotError> {
    let column = df
        .column(name)
        .map_err(|e| PlotError::MissingColumn(name.to_string(), e))?;
    Ok(column.i32()?.iter().flatten().collect())
}

fn month_axis(df: &DataFrame, path: &Path) -> Result<Vec<NaiveDate>, PlotError> {
    let years = key_axis(df, "year")?;
    let months = key_axis(df, "month")?;
    years
        .iter()
        .zip(months.iter())
        .map(|(y, m)| month_end(*y, *m as u32))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| PlotError::EmptySeries(path.to_path_buf()))
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.checked_add_months(Months::new(1)))
        .and_then(|d| d.pred_opt())
}

/// Padded y-range over every value of every series.
fn value_bounds<'a>(series: impl Iterator<Item = &'a Vec<Option<f64>>>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for values in series {
        for v in values.iter().flatten() {
            min = min.min(*v);
            max = max.max(*v);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let pad = 0.05 * (max - min).max(1e-9);
    Some((min - pad, max + pad))
}

fn render_date_lines(
    path: &Path,
    xs: &[NaiveDate],
    series: &[NamedValues],
    x_desc: &str,
    y_desc: &str,
) -> Result<(), PlotError> {
    let (x0, x1) = match (xs.first(), xs.last()) {
        (Some(a), Some(b)) => (*a, *b),
        _ => return Err(PlotError::EmptySeries(path.to_path_buf())),
    };
    let (y0, y1) = value_bounds(series.iter().map(|(_, v)| v))
        .ok_or_else(|| PlotError::EmptySeries(path.to_path_buf()))?;

    let drawn = (|| -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, (FIG_WIDTH, FIG_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 160)
            .set_label_area_size(LabelAreaPosition::Bottom, 180)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc(y_desc)
            .axis_desc_style(AXIS_FONT)
            .label_style(LABEL_FONT)
            .x_label_style(LABEL_FONT.into_font().transform(FontTransform::Rotate90))
            .draw()?;

        for (i, (name, values)) in series.iter().enumerate() {
            let color = palette(i);
            chart
                .draw_series(LineSeries::new(
                    xs.iter()
                        .zip(values.iter())
                        .filter_map(|(x, v)| v.map(|v| (*x, v))),
                    color.stroke_width(LINE_WIDTH),
                ))?
                .label(name.clone())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 60, y)], color.stroke_width(LINE_WIDTH))
                });
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(LABEL_FONT)
            .draw()?;

        root.present()?;
        Ok(())
    })();

    drawn.map_err(|e| PlotError::Render(path.to_path_buf(), e.to_string()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn render_key_lines(
    path: &Path,
    xs: &[i32],
    series: &[NamedValues],
    envelope: Option<(&[NamedValues], &[NamedValues])>,
    x_desc: &str,
    y_desc: &str,
) -> Result<(), PlotError> {
    let (x0, x1) = match (xs.first(), xs.last()) {
        (Some(a), Some(b)) => (*a, *b),
        _ => return Err(PlotError::EmptySeries(path.to_path_buf())),
    };
    // The envelope can extend past the mean lines, so include it in the range.
    let mut value_sets: Vec<&Vec<Option<f64>>> = series.iter().map(|(_, v)| v).collect();
    if let Some((lo, hi)) = envelope {
        value_sets.extend(lo.iter().map(|(_, v)| v));
        value_sets.extend(hi.iter().map(|(_, v)| v));
    }
    let (y0, y1) = value_bounds(value_sets.into_iter())
        .ok_or_else(|| PlotError::EmptySeries(path.to_path_buf()))?;

    let drawn = (|| -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, (FIG_WIDTH, FIG_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 160)
            .set_label_area_size(LabelAreaPosition::Bottom, 180)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc(y_desc)
            .axis_desc_style(AXIS_FONT)
            .label_style(LABEL_FONT)
            .x_label_style(LABEL_FONT.into_font().transform(FontTransform::Rotate90))
            .draw()?;

        if let Some((lo, hi)) = envelope {
            for (i, ((_, lo_values), (_, hi_values))) in lo.iter().zip(hi.iter()).enumerate() {
                let color = palette(i);
                let mut band: Vec<(i32, f64)> = xs
                    .iter()
                    .zip(lo_values.iter())
                    .filter_map(|(x, v)| v.map(|v| (*x, v)))
                    .collect();
                let upper: Vec<(i32, f64)> = xs
                    .iter()
                    .zip(hi_values.iter())
                    .filter_map(|(x, v)| v.map(|v| (*x, v)))
                    .rev()
                    .collect();
                band.extend(upper);
                chart.draw_series(std::iter::once(Polygon::new(
                    band,
                    color.mix(ENVELOPE_ALPHA).filled(),
                )))?;
            }
        }

        for (i, (name, values)) in series.iter().enumerate() {
            let color = palette(i);
            chart
                .draw_series(LineSeries::new(
                    xs.iter()
                        .zip(values.iter())
                        .filter_map(|(x, v)| v.map(|v| (*x, v))),
                    color.stroke_width(LINE_WIDTH),
                ))?
                .label(name.clone())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 60, y)], color.stroke_width(LINE_WIDTH))
                });
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(LABEL_FONT)
            .draw()?;

        root.present()?;
        Ok(())
    })();

    drawn.map_err(|e| PlotError::Render(path.to_path_buf(), e.to_string()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use tempfile::tempdir;

    fn locations() -> Vec<String> {
        vec!["A".to_string(), "B".to_string()]
    }

    fn daily_df() -> DataFrame {
        let dates = [
            NaiveDate::from_ymd_opt(2007, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2007, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2007, 1, 3).unwrap(),
        ];
        let time = DateChunked::from_naive_date(PlSmallStr::from_static("time"), dates)
            .into_series();
        DataFrame::new(vec![
            Column::from(time),
            Column::new(
                PlSmallStr::from_static("A"),
                vec![Some(26.0), None, Some(28.0)],
            ),
            Column::new(
                PlSmallStr::from_static("B"),
                vec![Some(24.5), Some(25.0), Some(25.5)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn month_end_handles_year_boundary_and_leap_february() {
        assert_eq!(month_end(2007, 12), NaiveDate::from_ymd_opt(2007, 12, 31));
        assert_eq!(month_end(2020, 2), NaiveDate::from_ymd_opt(2020, 2, 29));
        assert_eq!(month_end(2019, 2), NaiveDate::from_ymd_opt(2019, 2, 28));
    }

    #[test]
    fn ensure_output_dir_is_idempotent() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("plots");
        ensure_output_dir(&target).unwrap();
        assert!(target.is_dir());
        ensure_output_dir(&target).unwrap();
    }

    #[test]
    fn daily_chart_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("daily.png");
        daily_timeseries(&daily_df(), &locations(), "Temperature (°C)", &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn monthly_chart_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("monthly.png");
        let df = df!(
            "year" => &[2007i32, 2007, 2007],
            "month" => &[1i32, 2, 3],
            "A" => &[100.0, 150.0, 120.0],
            "B" => &[90.0, 95.0, 130.0],
        )
        .unwrap();
        monthly_timeseries(&df, &locations(), "Precipitation (mm/month)", &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn envelope_chart_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("envelope.png");
        let mean = df!(
            "month" => &[1i32, 2, 3],
            "A" => &[26.0, 27.0, 28.0],
            "B" => &[24.0, 25.0, 26.0],
        )
        .unwrap();
        let min = df!(
            "month" => &[1i32, 2, 3],
            "A" => &[25.0, 26.0, 27.0],
            "B" => &[23.0, 24.0, 25.0],
        )
        .unwrap();
        let max = df!(
            "month" => &[1i32, 2, 3],
            "A" => &[27.0, 28.0, 29.0],
            "B" => &[25.0, 26.0, 27.0],
        )
        .unwrap();
        climatology_with_envelope(
            &mean,
            &min,
            &max,
            PeriodKey::Month,
            &locations(),
            "Temperature (°C)",
            &path,
        )
        .unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn null_date_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nulldate.png");
        let time = DateChunked::from_naive_date_options(
            PlSmallStr::from_static("time"),
            vec![NaiveDate::from_ymd_opt(2007, 1, 1), None],
        )
        .into_series();
        let df = DataFrame::new(vec![
            Column::from(time),
            Column::new(PlSmallStr::from_static("A"), vec![Some(1.0), Some(2.0)]),
        ])
        .unwrap();
        let err = daily_timeseries(&df, &["A".to_string()], "y", &path).unwrap_err();
        assert!(matches!(err, PlotError::EmptySeries(_)));
        assert!(!path.exists());
    }

    #[test]
    fn empty_frame_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let time =
            DateChunked::from_naive_date(PlSmallStr::from_static("time"), Vec::<NaiveDate>::new())
                .into_series();
        let df = DataFrame::new(vec![
            Column::from(time),
            Column::new(PlSmallStr::from_static("A"), Vec::<Option<f64>>::new()),
        ])
        .unwrap();
        let err = daily_timeseries(&df, &["A".to_string()], "y", &path).unwrap_err();
        assert!(matches!(err, PlotError::EmptySeries(_)));
        assert!(!path.exists());
    }
}
