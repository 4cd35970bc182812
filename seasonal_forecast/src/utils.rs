//! Calendar utilities for the seasonal_forecast crate
//!
//! Months are numbered 1-12 and days 1-31 throughout the crate, exactly as
//! `chrono::Datelike::month` and `day` report them.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Days, NaiveDate};
use std::fmt;

/// Calendar day of the year, independent of the year itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Create a month-day key, rejecting days that no year has (e.g. 04-31).
    /// February 29th is accepted.
    pub fn new(month: u32, day: u32) -> Result<Self> {
        // 2000 is a leap year, so every real calendar day resolves
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(ForecastError::DateError(format!(
                "No calendar day {:02}-{:02}",
                month, day
            )));
        }

        Ok(Self { month, day })
    }

    /// Month-day of a concrete date
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Month, 1-12
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day of month, 1-31
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Whether `date` falls on this calendar day
    pub fn matches(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.day() == self.day
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Last day of the forecast horizon: December 31st of `target_year`
pub fn horizon_end(target_year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(target_year, 12, 31).ok_or_else(|| {
        ForecastError::DateError(format!("Year {} is out of range", target_year))
    })
}

/// First day of the trailing window of `days` days ending at `today`
pub fn window_start(today: NaiveDate, days: u32) -> Result<NaiveDate> {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .ok_or_else(|| {
            ForecastError::DateError(format!(
                "Cannot step {} days back from {}",
                days, today
            ))
        })
}

/// Date parsing for the loosely formatted dates found in cleaned price files
pub mod date_parser {
    use super::*;
    use chrono::{DateTime, NaiveDateTime};

    /// Parse a record date into a calendar date.
    ///
    /// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS`
    /// timestamps and `MM/DD/YYYY`. Timestamps keep the date as written,
    /// without shifting into another time zone.
    pub fn parse_date(input: &str) -> Result<NaiveDate> {
        let trimmed = input.trim();

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(date);
        }
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(timestamp.date_naive());
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(timestamp.date());
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
            return Ok(date);
        }

        Err(ForecastError::DateError(format!(
            "Unrecognized date: '{}'",
            input
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_day_validation() {
        assert!(MonthDay::new(2, 29).is_ok());
        assert!(MonthDay::new(4, 31).is_err());
        assert!(MonthDay::new(13, 1).is_err());
        assert!(MonthDay::new(0, 1).is_err());
    }

    #[test]
    fn test_month_day_of_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let key = MonthDay::of(date);
        assert_eq!(key, MonthDay::new(3, 7).unwrap());
        assert_eq!(key.to_string(), "03-07");
        assert!(key.matches(NaiveDate::from_ymd_opt(1999, 3, 7).unwrap()));
    }

    #[test]
    fn test_window_start() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(
            window_start(today, 60).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_parse_dates() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        assert_eq!(date_parser::parse_date("2023-01-15").unwrap(), expected);
        assert_eq!(date_parser::parse_date(" 2023-01-15 ").unwrap(), expected);
        assert_eq!(date_parser::parse_date("01/15/2023").unwrap(), expected);
        assert_eq!(
            date_parser::parse_date("2023-01-15T23:30:00").unwrap(),
            expected
        );
        assert_eq!(
            date_parser::parse_date("2023-01-15T23:30:00-08:00").unwrap(),
            expected
        );
        assert!(date_parser::parse_date("not-a-date").is_err());
        assert!(date_parser::parse_date("2023-02-30").is_err());
    }
}
