//! Recent-window trend estimation against the seasonal baseline

use crate::data::HistoricalSeries;
use crate::error::Result;
use crate::models::seasonal_index::SeasonalIndex;
use crate::utils::{window_start, MonthDay};
use chrono::NaiveDate;
use price_stats::{average, RatioBounds};
use std::collections::HashSet;

/// Multiplier applied when there is nothing to compare against
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

/// Observations from the trailing window before the run date
#[derive(Debug, Clone, PartialEq)]
pub struct RecentWindow {
    start: NaiveDate,
    prices: Vec<f64>,
    month_days: Vec<MonthDay>,
}

impl RecentWindow {
    /// Collect every usable observation dated on or after `today - window_days`.
    ///
    /// The window has no upper bound: observations dated after `today` count
    /// as recent. Prices are ordered newest first; calendar days are kept in
    /// the order the history first mentions them.
    pub fn extract(series: &HistoricalSeries, today: NaiveDate, window_days: u32) -> Result<Self> {
        let start = window_start(today, window_days)?;

        let mut recent: Vec<_> = series
            .observations()
            .filter(|obs| obs.is_usable() && obs.date >= start)
            .collect();

        let mut seen = HashSet::new();
        let month_days = recent
            .iter()
            .map(|obs| MonthDay::of(obs.date))
            .filter(|key| seen.insert(*key))
            .collect();

        // Stable, so same-day observations keep their record order
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        let prices = recent.iter().map(|obs| obs.price).collect();

        Ok(Self {
            start,
            prices,
            month_days,
        })
    }

    /// First date inside the window
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Recent prices, newest first
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Distinct calendar days observed in the window
    pub fn month_days(&self) -> &[MonthDay] {
        &self.month_days
    }

    /// Number of recent observations
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Check if the window holds no observations
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// How a trend multiplier was arrived at
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrendBasis {
    /// Ratio of recent prices to the seasonal baseline, before clamping
    Observed {
        recent_average: f64,
        historical_average: f64,
        raw_ratio: f64,
    },
    /// No observation fell inside the recent window
    EmptyRecentWindow,
    /// None of the recent calendar days has a seasonal baseline
    NoSeasonalComparison,
    /// The seasonal baseline averaged to zero
    ZeroHistoricalAverage,
}

/// Bounded multiplier describing where the market sits against its seasonal norm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendEstimate {
    multiplier: f64,
    basis: TrendBasis,
    recent_points: usize,
}

impl TrendEstimate {
    fn neutral(basis: TrendBasis, recent_points: usize) -> Self {
        Self {
            multiplier: NEUTRAL_MULTIPLIER,
            basis,
            recent_points,
        }
    }

    /// The clamped multiplier
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// How the multiplier was derived
    pub fn basis(&self) -> TrendBasis {
        self.basis
    }

    /// Number of recent observations the estimate saw
    pub fn recent_points(&self) -> usize {
        self.recent_points
    }

    /// Whether the multiplier fell back to neutral for lack of data
    pub fn is_fallback(&self) -> bool {
        !matches!(self.basis, TrendBasis::Observed { .. })
    }
}

/// Compare the recent window against the seasonal baseline.
///
/// The baseline is the average of per-calendar-day medians over the days seen
/// in the window, while the recent side is a plain average of raw prices.
/// Recent observations are not removed from the history they are compared to.
pub fn estimate_trend(
    index: &SeasonalIndex,
    window: &RecentWindow,
    bounds: RatioBounds,
) -> TrendEstimate {
    let recent_points = window.len();
    if window.is_empty() {
        return TrendEstimate::neutral(TrendBasis::EmptyRecentWindow, recent_points);
    }

    let recent_average = average(window.prices());

    let seasonal_medians: Vec<f64> = window
        .month_days()
        .iter()
        .filter_map(|key| index.median_for(*key))
        .collect();
    if seasonal_medians.is_empty() {
        return TrendEstimate::neutral(TrendBasis::NoSeasonalComparison, recent_points);
    }

    let historical_average = average(&seasonal_medians);
    if historical_average == 0.0 {
        return TrendEstimate::neutral(TrendBasis::ZeroHistoricalAverage, recent_points);
    }

    let raw_ratio = recent_average / historical_average;
    TrendEstimate {
        multiplier: bounds.clamp(raw_ratio),
        basis: TrendBasis::Observed {
            recent_average,
            historical_average,
            raw_ratio,
        },
        recent_points,
    }
}
