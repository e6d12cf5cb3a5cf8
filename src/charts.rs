use std::{
    fs,
    ops::Range,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use plotters::prelude::*;
use time::Date;
use tracing::{info, instrument};

use crate::{
    error::ChartError,
    record::{CleanedRecord, Column},
    series::{self, TemperaturePoint},
    stats::MonthlyStatistics,
};

pub const TEMPERATURE_TREND: &str = "temp_trend_line.png";
pub const MONTHLY_RAINFALL: &str = "monthly_rainfall_bar.png";
pub const HUMIDITY_SCATTER: &str = "combined_scatter_plots.png";

/// Render the three charts into `dir`, creating it if needed.
/// Returns the paths of the written files.
#[instrument(skip(records, monthly), fields(rows = records.len()))]
pub fn render_all(
    records: &[CleanedRecord],
    monthly: &MonthlyStatistics,
    dir: &Path,
) -> Result<Vec<PathBuf>, ChartError> {
    fs::create_dir_all(dir).map_err(|source| ChartError::Directory {
        path: dir.to_path_buf(),
        source,
    })?;

    let trend = dir.join(TEMPERATURE_TREND);
    temperature_trend(&series::temperature_trend(records), &trend)?;
    info!("Saved: {}", trend.display());

    let rainfall = dir.join(MONTHLY_RAINFALL);
    monthly_rainfall(&series::monthly_rainfall(monthly), &rainfall)?;
    info!("Saved: {}", rainfall.display());

    let scatter = dir.join(HUMIDITY_SCATTER);
    humidity_scatter(
        &series::humidity_scatter(records, Column::MaxTemp),
        &series::humidity_scatter(records, Column::MinTemp),
        &scatter,
    )?;
    info!("Saved: {}", scatter.display());

    Ok(vec![trend, rainfall, scatter])
}

// plotters only understands chrono dates.
fn to_naive(date: Date) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month() as u32, date.day() as u32)
}

fn padded(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (low, high) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), v| {
        (low.min(v), high.max(v))
    });
    if !low.is_finite() || !high.is_finite() {
        return 0.0..1.0;
    }
    let pad = ((high - low) * 0.05).max(1.0);
    (low - pad)..(high + pad)
}

pub fn temperature_trend(points: &[TemperaturePoint], path: &Path) -> Result<(), ChartError> {
    let dated: Vec<(NaiveDate, &TemperaturePoint)> = points
        .iter()
        .filter_map(|p| Some((to_naive(p.date)?, p)))
        .collect();
    let (Some(first), Some(last)) = (dated.first(), dated.last()) else {
        return Ok(());
    };
    let start = first.0;
    let end = last.0.succ_opt().unwrap_or(last.0);
    let y_range = padded(points.iter().flat_map(|p| [p.min_temp, p.max_temp]));

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Daily Temperature Trend (Max and Min)",
            ("sans-serif", 30).into_font(),
        )
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(start..end, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Temperature (°C)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            dated.iter().map(|(date, p)| (*date, p.max_temp)),
            RED,
        ))?
        .label("Max Temp")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    chart.draw_series(
        dated
            .iter()
            .map(|(date, p)| Circle::new((*date, p.max_temp), 3, RED.filled())),
    )?;

    chart
        .draw_series(LineSeries::new(
            dated.iter().map(|(date, p)| (*date, p.min_temp)),
            BLUE,
        ))?
        .label("Min Temp")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart.draw_series(
        dated
            .iter()
            .map(|(date, p)| Circle::new((*date, p.min_temp), 3, BLUE.filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

pub fn monthly_rainfall(bars: &[(String, f64)], path: &Path) -> Result<(), ChartError> {
    if bars.is_empty() {
        return Ok(());
    }
    let top = bars.iter().map(|(_, total)| *total).fold(0.0, f64::max);
    let top = if top > 0.0 { top * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly Rainfall Totals", ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0usize..bars.len()).into_segmented(), 0f64..top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|x: &SegmentValue<usize>| match x {
            SegmentValue::CenterOf(i) => bars.get(*i).map(|b| b.0.clone()).unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("Month")
        .y_desc("Total Rainfall (mm)")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(CYAN.mix(0.8).filled())
            .margin(10)
            .data(bars.iter().enumerate().map(|(i, (_, total))| (i, *total))),
    )?;

    root.present()?;
    Ok(())
}

pub fn humidity_scatter(
    max_temp: &[(f64, f64)],
    min_temp: &[(f64, f64)],
    path: &Path,
) -> Result<(), ChartError> {
    if max_temp.is_empty() && min_temp.is_empty() {
        return Ok(());
    }

    let root = BitMapBackend::new(path, (1500, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(
        "Combined Weather Visualizations",
        ("sans-serif", 30).into_font(),
    )?;
    let panels = root.split_evenly((1, 2));

    let specs = [
        ("Humidity vs. Max Temperature", "Max Temperature (°C)", max_temp, MAGENTA),
        ("Humidity vs. Min Temperature", "Min Temperature (°C)", min_temp, RGBColor(255, 165, 0)),
    ];

    for (panel, (title, x_desc, points, color)) in panels.iter().zip(specs) {
        let mut chart = ChartBuilder::on(panel)
            .caption(title, ("sans-serif", 24).into_font())
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(
                padded(points.iter().map(|p| p.0)),
                padded(points.iter().map(|p| p.1)),
            )?;

        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc("Humidity (%)")
            .draw()?;

        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, color.mix(0.6).filled())),
        )?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn padding() {
        assert_eq!(padded([10.0, 12.0].into_iter()), 9.0..13.0);
        assert_eq!(padded([5.0].into_iter()), 4.0..6.0);
        assert_eq!(padded(std::iter::empty()), 0.0..1.0);
    }

    #[test]
    fn naive_dates() {
        assert_eq!(
            to_naive(date!(2024 - 02 - 29)),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn empty_series_draw_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nothing.png");
        temperature_trend(&[], &path).unwrap();
        monthly_rainfall(&[], &path).unwrap();
        humidity_scatter(&[], &[], &path).unwrap();
        assert!(!path.exists());
    }
}
