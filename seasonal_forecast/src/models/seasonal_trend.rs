//! Seasonal historical median scaled by the current market trend
//!
//! For each forecast day the model takes the median of every historical price
//! recorded on that calendar day and multiplies it by a bounded trend ratio
//! estimated once from the recent window.

use crate::config::ForecastConfig;
use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use crate::models::seasonal_index::SeasonalIndex;
use crate::models::trend::{estimate_trend, RecentWindow, TrendEstimate};
use crate::models::{
    ConfidenceBand, ForecastModel, ForecastPoint, ForecastSeries, TrainedForecastModel,
};
use crate::utils::MonthDay;
use chrono::NaiveDate;
use price_stats::RatioBounds;
use tracing::debug;

/// Seasonal historical + current trend model
#[derive(Debug, Clone)]
pub struct SeasonalTrendModel {
    /// Name of the model
    name: String,
    /// Trailing window used to estimate the trend, in days
    recent_window_days: u32,
    /// Clamp applied to the trend ratio
    trend_bounds: RatioBounds,
    /// Rounding and band applied to each forecast
    band: ConfidenceBand,
}

/// Seasonal trend model trained on one commodity's history
#[derive(Debug, Clone)]
pub struct TrainedSeasonalTrend {
    /// Name of the model
    name: String,
    /// Calendar-day lookup over the full history
    index: SeasonalIndex,
    /// Trend estimated at training time
    trend: TrendEstimate,
    /// Rounding and band applied to each forecast
    band: ConfidenceBand,
}

impl SeasonalTrendModel {
    /// Create a new seasonal trend model
    pub fn new(
        recent_window_days: u32,
        trend_bounds: RatioBounds,
        band: ConfidenceBand,
    ) -> Result<Self> {
        if recent_window_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "Recent window must span at least one day".to_string(),
            ));
        }
        trend_bounds.validate()?;
        if trend_bounds.floor <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "Trend floor must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!(
                "Seasonal Trend (window={}d, trend={}..{})",
                recent_window_days, trend_bounds.floor, trend_bounds.ceiling
            ),
            recent_window_days,
            trend_bounds,
            band,
        })
    }

    /// Create a model from validated configuration
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        Self::new(config.recent_window_days, config.trend_bounds, config.band()?)
    }
}

impl ForecastModel for SeasonalTrendModel {
    type Trained = TrainedSeasonalTrend;

    fn train(&self, series: &HistoricalSeries, today: NaiveDate) -> Result<Self::Trained> {
        let index = SeasonalIndex::build(series);
        let window = RecentWindow::extract(series, today, self.recent_window_days)?;
        let trend = estimate_trend(&index, &window, self.trend_bounds);

        Ok(TrainedSeasonalTrend {
            name: self.name.clone(),
            index,
            trend,
            band: self.band,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSeasonalTrend {
    /// Trend estimated at training time
    pub fn trend(&self) -> &TrendEstimate {
        &self.trend
    }

    /// Calendar-day index over the training history
    pub fn index(&self) -> &SeasonalIndex {
        &self.index
    }

    /// Forecast a single day, or `None` when that calendar day has no
    /// history or the forecast would not be positive
    pub fn forecast_for(&self, date: NaiveDate) -> Result<Option<ForecastPoint>> {
        let Some(seasonal_median) = self.index.median_for(MonthDay::of(date)) else {
            return Ok(None);
        };

        let raw = seasonal_median * self.trend.multiplier();
        if !(raw > 0.0) {
            return Ok(None);
        }

        self.band.apply(date, raw)
    }
}

impl TrainedForecastModel for TrainedSeasonalTrend {
    fn forecast_between(&self, start: NaiveDate, end: NaiveDate) -> Result<ForecastSeries> {
        let mut series = ForecastSeries::new();
        if end < start {
            debug!("Empty horizon: {} is after {}", start, end);
            return Ok(series);
        }

        let mut date = start;
        loop {
            if let Some(point) = self.forecast_for(date)? {
                series.push(point)?;
            }

            // `end` itself has been processed
            if date >= end {
                break;
            }
            date = date.succ_opt().ok_or_else(|| {
                ForecastError::DateError(format!("No day after {}", date))
            })?;
        }

        Ok(series)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
