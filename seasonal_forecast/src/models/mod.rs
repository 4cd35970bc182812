//! Forecasting models for seasonal commodity price series

use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use polars::prelude::{DataFrame, NamedFrom, Series};
use price_stats::round_to;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod seasonal_index;
pub mod seasonal_trend;
pub mod trend;

/// One forecast day with its confidence band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Forecast date
    pub date: NaiveDate,
    /// Forecast price, rounded
    pub forecast: f64,
    /// Lower band, computed from the rounded forecast
    pub lower: f64,
    /// Upper band, computed from the rounded forecast
    pub upper: f64,
}

/// Ordered forecast points of one commodity.
///
/// Dates are strictly increasing but not necessarily contiguous: days without
/// a seasonal baseline are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Create an empty series
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point; its date must come after the last point's date
    pub fn push(&mut self, point: ForecastPoint) -> Result<()> {
        if let Some(last) = self.points.last() {
            if point.date <= last.date {
                return Err(ForecastError::ValidationError(format!(
                    "Forecast date {} does not follow {}",
                    point.date, last.date
                )));
            }
        }
        self.points.push(point);
        Ok(())
    }

    /// Get the forecast points
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Get the number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point for a specific date, if one was emitted
    pub fn get(&self, date: NaiveDate) -> Option<&ForecastPoint> {
        self.points
            .binary_search_by(|point| point.date.cmp(&date))
            .ok()
            .map(|idx| &self.points[idx])
    }

    /// Flat tabular form with `date, forecast, lower, upper` columns
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let dates: Vec<String> = self
            .points
            .iter()
            .map(|point| point.date.format("%Y-%m-%d").to_string())
            .collect();
        let forecast: Vec<f64> = self.points.iter().map(|point| point.forecast).collect();
        let lower: Vec<f64> = self.points.iter().map(|point| point.lower).collect();
        let upper: Vec<f64> = self.points.iter().map(|point| point.upper).collect();

        let df = DataFrame::new(vec![
            Series::new("date", dates),
            Series::new("forecast", forecast),
            Series::new("lower", lower),
            Series::new("upper", upper),
        ])?;

        Ok(df)
    }
}

/// Fixed-percentage band around a rounded forecast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceBand {
    lower_factor: f64,
    upper_factor: f64,
    decimals: u32,
}

impl ConfidenceBand {
    /// Create a band, e.g. `ConfidenceBand::new(0.95, 1.05, 2)` for ±5%
    pub fn new(lower_factor: f64, upper_factor: f64, decimals: u32) -> Result<Self> {
        if !(lower_factor > 0.0 && lower_factor <= 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Lower band factor must be in (0, 1], got {}",
                lower_factor
            )));
        }
        if !(upper_factor >= 1.0 && upper_factor.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "Upper band factor must be at least 1, got {}",
                upper_factor
            )));
        }
        if decimals > price_stats::precision::MAX_DECIMALS {
            return Err(ForecastError::InvalidParameter(format!(
                "Cannot round to {} decimals",
                decimals
            )));
        }

        Ok(Self {
            lower_factor,
            upper_factor,
            decimals,
        })
    }

    /// Round `raw` and derive the band from the rounded value.
    ///
    /// Returns `None` when the rounded forecast is not positive.
    pub fn apply(&self, date: NaiveDate, raw: f64) -> Result<Option<ForecastPoint>> {
        let forecast = round_to(raw, self.decimals)?;
        if !(forecast > 0.0) {
            return Ok(None);
        }

        Ok(Some(ForecastPoint {
            date,
            forecast,
            lower: round_to(forecast * self.lower_factor, self.decimals)?,
            upper: round_to(forecast * self.upper_factor, self.decimals)?,
        }))
    }
}

impl Default for ConfidenceBand {
    fn default() -> Self {
        Self {
            lower_factor: 0.95,
            upper_factor: 1.05,
            decimals: 2,
        }
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Forecast every day from `start` through `end`, both inclusive
    fn forecast_between(&self, start: NaiveDate, end: NaiveDate) -> Result<ForecastSeries>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a commodity's price history
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a history as seen on `today`
    fn train(&self, series: &HistoricalSeries, today: NaiveDate) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}
