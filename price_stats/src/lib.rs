//! # Price Stats
//!
//! Statistical primitives for seasonal commodity price forecasting.
//! This crate provides the aggregate statistics used to build seasonal
//! baselines and the rounding/clamping helpers applied to forecast output.

use thiserror::Error;

// Statistic modules
pub mod central;
pub mod precision;

pub use central::{average, median};
pub use precision::{clamp_ratio, round_to, RatioBounds};

/// Errors that can occur in price statistic calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for price statistic operations
pub type Result<T> = std::result::Result<T, MathError>;
