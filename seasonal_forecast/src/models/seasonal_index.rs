//! Same-calendar-day lookups across every year of a price history

use crate::data::HistoricalSeries;
use crate::utils::MonthDay;
use price_stats::median;
use std::collections::HashMap;

/// Historical prices grouped by calendar day (month + day-of-month).
///
/// Built once per commodity so each forecast day is a hash lookup instead of
/// a scan over every year. `prices_for` returns exactly what
/// `HistoricalSeries::prices_on` would.
#[derive(Debug, Clone, Default)]
pub struct SeasonalIndex {
    prices: HashMap<MonthDay, Vec<f64>>,
}

impl SeasonalIndex {
    /// Index every usable observation of `series`
    pub fn build(series: &HistoricalSeries) -> Self {
        let mut prices: HashMap<MonthDay, Vec<f64>> = HashMap::new();
        for observation in series.observations().filter(|obs| obs.is_usable()) {
            prices
                .entry(MonthDay::of(observation.date))
                .or_default()
                .push(observation.price);
        }

        Self { prices }
    }

    /// All historical prices for `month_day`; empty when none were recorded
    pub fn prices_for(&self, month_day: MonthDay) -> &[f64] {
        self.prices
            .get(&month_day)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Seasonal baseline for `month_day`, or `None` without history.
    ///
    /// A missing baseline is never reported as a zero price.
    pub fn median_for(&self, month_day: MonthDay) -> Option<f64> {
        let prices = self.prices_for(month_day);
        if prices.is_empty() {
            None
        } else {
            Some(median(prices))
        }
    }

    /// Number of distinct calendar days with history
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Check if no calendar day has history
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
