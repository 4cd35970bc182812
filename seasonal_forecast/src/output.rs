//! Writers for forecast output
//!
//! Two shapes are produced: one combined JSON document keyed by commodity, and
//! a flat `date,forecast,lower,upper` CSV per commodity. A summary CSV records
//! the status of every commodity in the batch.

use crate::error::Result;
use crate::models::ForecastSeries;
use crate::pipeline::{BatchOutcome, CommodityStatus};
use polars::prelude::{CsvWriter, SerWriter};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of each per-commodity forecast
pub const COMMODITY_FORECAST_FILE: &str = "forecast.csv";

/// Write `{commodity: [{date, forecast, lower, upper}, ...]}` as pretty JSON
pub fn write_combined_json<P: AsRef<Path>>(path: P, outcome: &BatchOutcome) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &outcome.forecasts)?;
    writer.flush()?;

    info!("Wrote {} forecasts to {}", outcome.forecasts.len(), path.display());
    Ok(())
}

/// Write one commodity's forecast to `dir/<commodity>/forecast.csv`
pub fn write_commodity_csv<P: AsRef<Path>>(
    dir: P,
    commodity: &str,
    series: &ForecastSeries,
) -> Result<PathBuf> {
    let commodity_dir = dir.as_ref().join(directory_name(commodity));
    fs::create_dir_all(&commodity_dir)?;
    let path = commodity_dir.join(COMMODITY_FORECAST_FILE);

    let mut df = series.to_dataframe()?;
    let file = File::create(&path)?;
    CsvWriter::new(file).has_header(true).finish(&mut df)?;

    Ok(path)
}

/// Write the CSV of every successful commodity; returns the number written
pub fn write_all_commodity_csv<P: AsRef<Path>>(dir: P, outcome: &BatchOutcome) -> Result<usize> {
    let dir = dir.as_ref();
    for (commodity, series) in &outcome.forecasts {
        write_commodity_csv(dir, commodity, series)?;
    }
    Ok(outcome.forecasts.len())
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    commodity: &'a str,
    status: &'static str,
    trend_multiplier: Option<f64>,
    recent_points: Option<usize>,
    forecast_points: usize,
    reason: &'a str,
}

/// Write one status row per commodity of the batch
pub fn write_summary_csv<P: AsRef<Path>>(path: P, outcome: &BatchOutcome) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    for report in &outcome.reports {
        let (status, forecast_points, reason) = match &report.status {
            CommodityStatus::Generated { points } => ("generated", *points, ""),
            CommodityStatus::Skipped => ("skipped", 0, "insufficient data"),
            CommodityStatus::Failed { reason } => ("failed", 0, reason.as_str()),
        };
        writer.serialize(SummaryRow {
            commodity: &report.commodity,
            status,
            trend_multiplier: report.trend.map(|trend| trend.multiplier()),
            recent_points: report.trend.map(|trend| trend.recent_points()),
            forecast_points,
            reason,
        })?;
    }
    writer.flush()?;

    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Commodity names become directory names; separators would escape `dir`
fn directory_name(commodity: &str) -> String {
    commodity
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}
