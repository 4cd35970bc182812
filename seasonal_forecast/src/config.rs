//! Tunable constants of the forecasting pipeline

use crate::error::{ForecastError, Result};
use crate::models::ConfidenceBand;
use crate::utils::horizon_end;
use chrono::NaiveDate;
use price_stats::precision::MAX_DECIMALS;
use price_stats::RatioBounds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default trailing window for trend estimation, in days
pub const DEFAULT_RECENT_WINDOW_DAYS: u32 = 60;
/// Default last forecast year (the horizon ends December 31st)
pub const DEFAULT_TARGET_YEAR: i32 = 2026;
/// Default lower band multiplier (-5%)
pub const DEFAULT_LOWER_BAND_FACTOR: f64 = 0.95;
/// Default upper band multiplier (+5%)
pub const DEFAULT_UPPER_BAND_FACTOR: f64 = 1.05;
/// Default rounding precision for monetary output
pub const DEFAULT_DECIMALS: u32 = 2;

/// Pipeline configuration.
///
/// Every field has a default, so a JSON override file only needs the keys it
/// changes:
///
/// ```json
/// { "target_year": 2027, "trend_bounds": { "floor": 0.6, "ceiling": 1.8 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Trailing window for the trend estimate, in days
    pub recent_window_days: u32,
    /// Closed interval the trend multiplier is clamped into
    pub trend_bounds: RatioBounds,
    /// Lower confidence band multiplier
    pub lower_band_factor: f64,
    /// Upper confidence band multiplier
    pub upper_band_factor: f64,
    /// Forecasts run through December 31st of this year
    pub target_year: i32,
    /// Decimal places of every monetary output
    pub decimals: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            recent_window_days: DEFAULT_RECENT_WINDOW_DAYS,
            trend_bounds: RatioBounds::default(),
            lower_band_factor: DEFAULT_LOWER_BAND_FACTOR,
            upper_band_factor: DEFAULT_UPPER_BAND_FACTOR,
            target_year: DEFAULT_TARGET_YEAR,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl ForecastConfig {
    /// Load a (possibly partial) configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter
    pub fn validate(&self) -> Result<()> {
        if self.recent_window_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "recent_window_days must be positive".to_string(),
            ));
        }
        self.trend_bounds
            .validate()
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        if self.trend_bounds.floor <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "trend_bounds.floor must be positive".to_string(),
            ));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(ForecastError::InvalidParameter(format!(
                "decimals must be at most {}",
                MAX_DECIMALS
            )));
        }
        self.band()?;
        self.horizon_end()?;
        Ok(())
    }

    /// Rounding and confidence band described by this configuration
    pub fn band(&self) -> Result<ConfidenceBand> {
        ConfidenceBand::new(self.lower_band_factor, self.upper_band_factor, self.decimals)
    }

    /// Last day of the forecast horizon
    pub fn horizon_end(&self) -> Result<NaiveDate> {
        horizon_end(self.target_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ForecastConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.recent_window_days, 60);
        assert_eq!(config.trend_bounds, RatioBounds::new(0.5, 2.0).unwrap());
        assert_eq!(
            config.horizon_end().unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_partial_json_override() {
        let config: ForecastConfig =
            serde_json::from_str(r#"{"target_year": 2027, "trend_bounds": {"ceiling": 1.5}}"#)
                .unwrap();
        assert_eq!(config.target_year, 2027);
        assert_eq!(config.trend_bounds.floor, 0.5);
        assert_eq!(config.trend_bounds.ceiling, 1.5);
        assert_eq!(config.decimals, 2);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let mut config = ForecastConfig::default();
        config.recent_window_days = 0;
        assert!(config.validate().is_err());

        let mut config = ForecastConfig::default();
        config.trend_bounds = RatioBounds {
            floor: 2.0,
            ceiling: 0.5,
        };
        assert!(config.validate().is_err());

        let mut config = ForecastConfig::default();
        config.lower_band_factor = 1.2;
        assert!(config.validate().is_err());

        let mut config = ForecastConfig::default();
        config.decimals = 16;
        assert!(config.validate().is_err());
    }
}
