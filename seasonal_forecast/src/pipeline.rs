//! Per-commodity batch orchestration
//!
//! Every commodity is forecast in isolation: a failure in one is recorded in
//! its report and never stops the others. With the `parallel` feature the
//! commodities are fanned out over rayon; results are keyed by commodity name
//! so the outcome does not depend on completion order.

use crate::config::ForecastConfig;
use crate::data::{Dataset, HistoricalSeries};
use crate::error::{ForecastError, Result};
use crate::models::seasonal_trend::SeasonalTrendModel;
use crate::models::trend::TrendEstimate;
use crate::models::{ForecastModel, ForecastSeries, TrainedForecastModel};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Forecast of one commodity together with the trend that shaped it
#[derive(Debug, Clone)]
pub struct CommodityForecast {
    /// Forecast points
    pub series: ForecastSeries,
    /// Trend multiplier and how it was derived
    pub trend: TrendEstimate,
}

/// What happened to a commodity in a batch run
#[derive(Debug, Clone, PartialEq)]
pub enum CommodityStatus {
    /// At least one forecast point was produced
    Generated { points: usize },
    /// No date in the horizon had a seasonal baseline
    Skipped,
    /// The commodity could not be processed
    Failed { reason: String },
}

/// Per-commodity line of a batch report
#[derive(Debug, Clone)]
pub struct CommodityReport {
    /// Commodity name
    pub commodity: String,
    /// Outcome
    pub status: CommodityStatus,
    /// Trend estimate, when training got that far
    pub trend: Option<TrendEstimate>,
}

/// Result of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Successful forecasts keyed by commodity
    pub forecasts: BTreeMap<String, ForecastSeries>,
    /// One report per input commodity, in commodity order
    pub reports: Vec<CommodityReport>,
}

impl BatchOutcome {
    /// Commodities with a non-empty forecast
    pub fn succeeded(&self) -> usize {
        self.count(|status| matches!(status, CommodityStatus::Generated { .. }))
    }

    /// Commodities without any resolvable seasonal baseline
    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, CommodityStatus::Skipped))
    }

    /// Commodities that errored
    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, CommodityStatus::Failed { .. }))
    }

    /// Report of one commodity
    pub fn report(&self, commodity: &str) -> Option<&CommodityReport> {
        self.reports
            .iter()
            .find(|report| report.commodity == commodity)
    }

    fn count(&self, predicate: impl Fn(&CommodityStatus) -> bool) -> usize {
        self.reports
            .iter()
            .filter(|report| predicate(&report.status))
            .count()
    }
}

/// Seasonal forecasting batch job
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: ForecastConfig,
    model: SeasonalTrendModel,
    horizon_end: NaiveDate,
    force_sequential: bool,
}

impl ForecastPipeline {
    /// Create a pipeline from configuration
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        let model = SeasonalTrendModel::from_config(&config)?;
        let horizon_end = config.horizon_end()?;

        Ok(Self {
            config,
            model,
            horizon_end,
            force_sequential: false,
        })
    }

    /// Process commodities one after another even when the `parallel`
    /// feature is enabled
    pub fn with_sequential(mut self, force_sequential: bool) -> Self {
        self.force_sequential = force_sequential;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Last forecast date
    pub fn horizon_end(&self) -> NaiveDate {
        self.horizon_end
    }

    /// Forecast one commodity from `today` through the horizon end.
    ///
    /// Returns `ForecastError::EmptyForecast` when no date had a baseline.
    pub fn forecast_commodity(
        &self,
        commodity: &str,
        series: &HistoricalSeries,
        today: NaiveDate,
    ) -> Result<CommodityForecast> {
        let trained = self.model.train(series, today)?;
        let trend = *trained.trend();
        let forecast = trained.forecast_between(today, self.horizon_end)?;

        if forecast.is_empty() {
            return Err(ForecastError::EmptyForecast {
                commodity: commodity.to_string(),
            });
        }

        Ok(CommodityForecast {
            series: forecast,
            trend,
        })
    }

    /// Forecast every commodity of `dataset`.
    ///
    /// Only an empty dataset fails the batch as a whole.
    pub fn run(&self, dataset: &Dataset, today: NaiveDate) -> Result<BatchOutcome> {
        if dataset.is_empty() {
            return Err(ForecastError::EmptyDataset);
        }
        info!(
            "Forecasting {} commodities from {} through {}",
            dataset.len(),
            today,
            self.horizon_end
        );

        let entries: Vec<(&str, &HistoricalSeries)> = dataset.commodities().collect();
        let process = |(commodity, series): &(&str, &HistoricalSeries)| {
            self.process_commodity(commodity, series, today)
        };

        #[cfg(feature = "parallel")]
        let results: Vec<_> = if self.force_sequential {
            entries.iter().map(process).collect()
        } else {
            entries.par_iter().map(process).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = entries.iter().map(process).collect();

        let mut outcome = BatchOutcome::default();
        for (report, series) in results {
            if let Some(series) = series {
                outcome.forecasts.insert(report.commodity.clone(), series);
            }
            outcome.reports.push(report);
        }

        info!(
            "Forecast generation complete: {} succeeded, {} skipped, {} failed",
            outcome.succeeded(),
            outcome.skipped(),
            outcome.failed()
        );
        Ok(outcome)
    }

    fn process_commodity(
        &self,
        commodity: &str,
        series: &HistoricalSeries,
        today: NaiveDate,
    ) -> (CommodityReport, Option<ForecastSeries>) {
        info!("Generating forecasts for: {}", commodity);

        let trained = match self.model.train(series, today) {
            Ok(trained) => trained,
            Err(err) => return failed(commodity, None, err),
        };
        let trend = *trained.trend();
        info!(
            commodity,
            trend_multiplier = trend.multiplier(),
            recent_points = trend.recent_points(),
            "Trend ratio: {:.3}x",
            trend.multiplier()
        );

        match trained.forecast_between(today, self.horizon_end) {
            Ok(forecast) if forecast.is_empty() => {
                warn!("No forecasts generated for {} (insufficient data)", commodity);
                let report = CommodityReport {
                    commodity: commodity.to_string(),
                    status: CommodityStatus::Skipped,
                    trend: Some(trend),
                };
                (report, None)
            }
            Ok(forecast) => {
                info!("Generated {} forecasts for {}", forecast.len(), commodity);
                let report = CommodityReport {
                    commodity: commodity.to_string(),
                    status: CommodityStatus::Generated {
                        points: forecast.len(),
                    },
                    trend: Some(trend),
                };
                (report, Some(forecast))
            }
            Err(err) => failed(commodity, Some(trend), err),
        }
    }
}

fn failed(
    commodity: &str,
    trend: Option<TrendEstimate>,
    err: ForecastError,
) -> (CommodityReport, Option<ForecastSeries>) {
    error!("Error generating forecasts for {}: {}", commodity, err);
    let report = CommodityReport {
        commodity: commodity.to_string(),
        status: CommodityStatus::Failed {
            reason: err.to_string(),
        },
        trend,
    };
    (report, None)
}
