//! # Seasonal Forecast
//!
//! Daily commodity price forecasting from multi-year seasonal history.
//!
//! ## Method
//!
//! 1. For each future date, take the median of every historical price recorded
//!    on the same month-day in any year (the seasonal baseline).
//! 2. Compare the prices of the last 60 days with the seasonal baselines of
//!    the calendar days they fall on.
//! 3. Clamp that ratio into `[0.5, 2.0]` (the trend multiplier).
//! 4. Forecast = seasonal median × trend multiplier, rounded to cents, with a
//!    ±5% band computed from the rounded value.
//!
//! Days whose calendar day never appears in the history are left out of the
//! forecast rather than filled with zeros.
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use seasonal_forecast::{DataLoader, ForecastConfig, ForecastPipeline};
//!
//! # fn main() -> seasonal_forecast::error::Result<()> {
//! // Load cleaned history
//! let dataset = DataLoader::from_json("data/prices/json/cleaned.json")?;
//!
//! // Forecast every commodity through December 31st of the target year
//! let pipeline = ForecastPipeline::new(ForecastConfig::default())?;
//! let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
//! let outcome = pipeline.run(&dataset, today)?;
//!
//! for (commodity, series) in &outcome.forecasts {
//!     println!("{}: {} forecast days", commodity, series.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::data::{DataLoader, Dataset, HistoricalSeries, PriceObservation};
pub use crate::error::ForecastError;
pub use crate::models::seasonal_trend::SeasonalTrendModel;
pub use crate::models::trend::{TrendBasis, TrendEstimate};
pub use crate::models::{ForecastModel, ForecastPoint, ForecastSeries, TrainedForecastModel};
pub use crate::pipeline::{BatchOutcome, CommodityStatus, ForecastPipeline};
pub use crate::utils::MonthDay;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
