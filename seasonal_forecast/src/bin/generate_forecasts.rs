//! Batch forecast generation over cleaned historical price data
//!
//! Reads every commodity's history, forecasts each day from today through
//! December 31st of the target year, and writes the combined JSON document,
//! one CSV per commodity and a summary CSV.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use seasonal_forecast::output::{write_all_commodity_csv, write_combined_json, write_summary_csv};
use seasonal_forecast::{DataLoader, ForecastConfig, ForecastPipeline};
use std::path::PathBuf;
use tracing::{info, warn};

/// Generate seasonal historical + trend price forecasts
#[derive(Parser, Debug)]
#[command(name = "generate_forecasts")]
#[command(about = "Forecast daily commodity prices from seasonal history")]
#[command(version)]
struct Args {
    /// Combined cleaned JSON ({commodity: {year: [{date, price}]}})
    #[arg(long, value_name = "FILE", conflicts_with = "cleaned_dir")]
    input: Option<PathBuf>,

    /// Directory laid out as <commodity>/<year>.csv
    #[arg(long, value_name = "DIR")]
    cleaned_dir: Option<PathBuf>,

    /// Combined forecast JSON to write
    #[arg(long, default_value = "data/prices/json/forecast.json")]
    output_json: PathBuf,

    /// Directory receiving <commodity>/forecast.csv and summary.csv
    #[arg(long, default_value = "data/prices/forecast")]
    forecast_dir: PathBuf,

    /// JSON file overriding configuration defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Last forecast year (horizon ends December 31st)
    #[arg(long, env = "FORECAST_TARGET_YEAR")]
    target_year: Option<i32>,

    /// Trailing window for the trend estimate, in days
    #[arg(long)]
    window_days: Option<u32>,

    /// Run date (defaults to the local date)
    #[arg(long, value_name = "YYYY-MM-DD")]
    today: Option<NaiveDate>,

    /// Skip the per-commodity CSV files
    #[arg(long)]
    no_csv: bool,

    /// Process commodities one at a time
    #[arg(long)]
    sequential: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ForecastConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ForecastConfig::default(),
    };
    if let Some(target_year) = args.target_year {
        config.target_year = target_year;
    }
    if let Some(window_days) = args.window_days {
        config.recent_window_days = window_days;
    }

    let dataset = match (&args.input, &args.cleaned_dir) {
        (Some(path), _) => DataLoader::from_json(path)
            .with_context(|| format!("reading {}", path.display()))?,
        (None, Some(dir)) => DataLoader::from_cleaned_dir(dir)
            .with_context(|| format!("reading {}", dir.display()))?,
        (None, None) => bail!("one of --input or --cleaned-dir is required"),
    };
    if dataset.rejected_records() > 0 {
        warn!("{} malformed records were dropped", dataset.rejected_records());
    }

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let pipeline = ForecastPipeline::new(config)
        .context("invalid configuration")?
        .with_sequential(args.sequential);
    let outcome = pipeline.run(&dataset, today)?;

    write_combined_json(&args.output_json, &outcome)
        .with_context(|| format!("writing {}", args.output_json.display()))?;
    if !args.no_csv {
        let written = write_all_commodity_csv(&args.forecast_dir, &outcome)
            .with_context(|| format!("writing CSVs under {}", args.forecast_dir.display()))?;
        info!("Wrote {} commodity CSV files", written);
    }
    write_summary_csv(args.forecast_dir.join("summary.csv"), &outcome)?;

    info!("Success: {} commodities", outcome.succeeded());
    info!("Skipped: {} commodities", outcome.skipped());
    info!("Failed: {} commodities", outcome.failed());
    info!("Output: {}", args.output_json.display());

    Ok(())
}
