//! # Seasonal Outlook
//!
//! `seasonal_outlook` bundles the seasonal price forecasting crates of this
//! workspace behind one dependency.
//!
//! ## Example
//!
//! ```
//! use seasonal_outlook::stats::{average, median};
//!
//! let january_firsts = [10.0, 12.0, 14.0];
//! assert_eq!(median(&january_firsts), 12.0);
//! assert_eq!(average(&january_firsts), 12.0);
//! ```

/// Statistical primitives (median, average, rounding, clamping)
pub use price_stats as stats;

/// Seasonal forecasting pipeline
pub use seasonal_forecast as forecast;

pub use seasonal_forecast::{
    BatchOutcome, DataLoader, Dataset, ForecastConfig, ForecastError, ForecastPipeline,
    ForecastSeries,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_facade_runs_pipeline() {
        let dataset = DataLoader::from_json_str(
            r#"{"Tomato": {"2024": [{"date": "2024-12-31", "price": 40.0}]}}"#,
        )
        .unwrap();
        let pipeline = ForecastPipeline::new(ForecastConfig::default()).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();

        let outcome: BatchOutcome = pipeline.run(&dataset, today).unwrap();
        let series: &ForecastSeries = &outcome.forecasts["Tomato"];
        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].forecast, 40.0);
    }
}
