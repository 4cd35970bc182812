//! Rounding and bounding helpers for monetary output

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Largest number of decimal places `round_to` accepts. Beyond this the
/// scale factor exceeds f64's exact integer range.
pub const MAX_DECIMALS: u32 = 15;

/// Round `value` to `decimals` places, halves away from zero.
///
/// The value is scaled, rounded and scaled back: `(value * 10^d).round() / 10^d`.
/// Callers that need bit-identical output must pass the already-multiplied
/// value (e.g. `round_to(forecast * 0.95, 2)`), since the multiplication
/// order changes the last bits.
pub fn round_to(value: f64, decimals: u32) -> Result<f64> {
    if decimals > MAX_DECIMALS {
        return Err(MathError::InvalidInput(format!(
            "Cannot round to {} decimals, maximum is {}",
            decimals, MAX_DECIMALS
        )));
    }

    let scale = 10_f64.powi(decimals as i32);
    Ok((value * scale).round() / scale)
}

/// Closed interval a ratio is clamped into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioBounds {
    /// Lower bound (inclusive)
    pub floor: f64,
    /// Upper bound (inclusive)
    pub ceiling: f64,
}

impl RatioBounds {
    /// Create bounds, rejecting non-finite or inverted intervals
    pub fn new(floor: f64, ceiling: f64) -> Result<Self> {
        let bounds = Self { floor, ceiling };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Check that both ends are finite and `floor <= ceiling`
    pub fn validate(&self) -> Result<()> {
        if !self.floor.is_finite() || !self.ceiling.is_finite() {
            return Err(MathError::InvalidInput(
                "Ratio bounds must be finite".to_string(),
            ));
        }
        if self.floor > self.ceiling {
            return Err(MathError::InvalidInput(format!(
                "Ratio floor {} is above ceiling {}",
                self.floor, self.ceiling
            )));
        }
        Ok(())
    }

    /// Clamp `ratio` into the interval
    pub fn clamp(&self, ratio: f64) -> f64 {
        self.floor.max(self.ceiling.min(ratio))
    }

    /// Whether `value` lies inside the interval
    pub fn contains(&self, value: f64) -> bool {
        value >= self.floor && value <= self.ceiling
    }
}

impl Default for RatioBounds {
    fn default() -> Self {
        Self {
            floor: 0.5,
            ceiling: 2.0,
        }
    }
}

/// Clamp `ratio` into `[floor, ceiling]`.
///
/// Computed as `max(floor, min(ceiling, ratio))`, so a NaN ratio resolves to
/// the ceiling.
pub fn clamp_ratio(ratio: f64, floor: f64, ceiling: f64) -> Result<f64> {
    Ok(RatioBounds::new(floor, ceiling)?.clamp(ratio))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_two_decimals() {
        assert_eq!(round_to(12.344, 2).unwrap(), 12.34);
        assert_eq!(round_to(12.345_000_1, 2).unwrap(), 12.35);
        assert_eq!(round_to(12.0, 2).unwrap(), 12.0);
    }

    #[test]
    fn test_round_to_band_products() {
        // 12 * 0.95 is 11.399999999999999 in binary floating point
        assert_eq!(round_to(12.0 * 0.95, 2).unwrap(), 11.4);
        assert_eq!(round_to(12.0 * 1.05, 2).unwrap(), 12.6);
    }

    #[test]
    fn test_round_to_rejects_excess_precision() {
        assert!(round_to(1.0, 16).is_err());
        assert!(round_to(1.0, 0).is_ok());
    }

    #[test]
    fn test_clamp_ratio() {
        assert_eq!(clamp_ratio(3.0, 0.5, 2.0).unwrap(), 2.0);
        assert_eq!(clamp_ratio(0.1, 0.5, 2.0).unwrap(), 0.5);
        assert_eq!(clamp_ratio(1.5, 0.5, 2.0).unwrap(), 1.5);
        assert_eq!(clamp_ratio(f64::NAN, 0.5, 2.0).unwrap(), 2.0);
    }

    #[test]
    fn test_inverted_bounds() {
        assert!(clamp_ratio(1.0, 2.0, 0.5).is_err());
        assert!(RatioBounds::new(0.5, f64::INFINITY).is_err());
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = RatioBounds::default();
        assert!(bounds.contains(0.5));
        assert!(bounds.contains(2.0));
        assert!(!bounds.contains(2.01));
    }
}
