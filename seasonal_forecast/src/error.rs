//! Error types for the seasonal_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the seasonal_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to output validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from calendar arithmetic
    #[error("Date error: {0}")]
    DateError(String),

    /// The input dataset holds no commodities at all
    #[error("Dataset contains no commodities")]
    EmptyDataset,

    /// No date in the horizon had a seasonal baseline
    #[error("No forecasts generated for '{commodity}' (insufficient data)")]
    EmptyForecast { commodity: String },

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON (de)serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from CSV reading or writing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from the statistics crate
    #[error("Math error: {0}")]
    MathError(#[from] price_stats::MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
