//! Historical price data handling for forecasting

use crate::error::{ForecastError, Result};
use crate::utils::{date_parser, MonthDay};
use chrono::{Datelike, NaiveDate};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// A single dated price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceObservation {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Observed price
    pub price: f64,
}

impl PriceObservation {
    /// Create a new observation
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }

    /// Only strictly positive, finite prices take part in any statistic
    pub fn is_usable(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// Multi-year price history of one commodity, keyed by year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalSeries {
    years: BTreeMap<String, Vec<PriceObservation>>,
}

impl HistoricalSeries {
    /// Create an empty series
    pub fn new() -> Self {
        Self::default()
    }

    /// Group observations by the calendar year of their date
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = PriceObservation>,
    {
        let mut series = Self::new();
        for observation in observations {
            series.push(observation.date.year().to_string(), observation);
        }
        series
    }

    /// Replace the observations stored under `year`
    pub fn insert_year(&mut self, year: impl Into<String>, observations: Vec<PriceObservation>) {
        self.years.insert(year.into(), observations);
    }

    /// Append one observation under `year`
    pub fn push(&mut self, year: impl Into<String>, observation: PriceObservation) {
        self.years.entry(year.into()).or_default().push(observation);
    }

    /// Year keys with their observations, in key order
    pub fn years(&self) -> impl Iterator<Item = (&str, &[PriceObservation])> {
        self.years
            .iter()
            .map(|(year, observations)| (year.as_str(), observations.as_slice()))
    }

    /// Every observation across all years
    pub fn observations(&self) -> impl Iterator<Item = &PriceObservation> {
        self.years.values().flatten()
    }

    /// Number of observations across all years
    pub fn len(&self) -> usize {
        self.years.values().map(Vec::len).sum()
    }

    /// Check if the series holds no observations
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every usable price ever recorded on `month_day`, across all years.
    ///
    /// Order follows year keys then record order; callers only aggregate it.
    pub fn prices_on(&self, month_day: MonthDay) -> Vec<f64> {
        self.observations()
            .filter(|obs| obs.is_usable() && month_day.matches(obs.date))
            .map(|obs| obs.price)
            .collect()
    }

    /// Date of the most recent observation, if any
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.observations().map(|obs| obs.date).max()
    }
}

/// Price histories of every commodity in a batch
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    commodities: BTreeMap<String, HistoricalSeries>,
    rejected_records: usize,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a commodity's history
    pub fn insert(&mut self, commodity: impl Into<String>, series: HistoricalSeries) {
        self.commodities.insert(commodity.into(), series);
    }

    /// History of one commodity
    pub fn get(&self, commodity: &str) -> Option<&HistoricalSeries> {
        self.commodities.get(commodity)
    }

    /// Commodities with their histories, ordered by name
    pub fn commodities(&self) -> impl Iterator<Item = (&str, &HistoricalSeries)> {
        self.commodities
            .iter()
            .map(|(name, series)| (name.as_str(), series))
    }

    /// Number of commodities
    pub fn len(&self) -> usize {
        self.commodities.len()
    }

    /// Check if the dataset holds no commodities
    pub fn is_empty(&self) -> bool {
        self.commodities.is_empty()
    }

    /// Records dropped during ingestion (bad date, bad or non-positive price)
    pub fn rejected_records(&self) -> usize {
        self.rejected_records
    }
}

/// Data loader for cleaned historical price data
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load the combined cleaned JSON document
    /// (`{commodity: {year: [{date, price, ...}]}}`) from a file
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let dataset = Self::from_json_str(&text)?;
        info!(
            "Loaded {} commodities from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse the combined cleaned JSON document from a string
    pub fn from_json_str(text: &str) -> Result<Dataset> {
        let document: Value = serde_json::from_str(text)?;
        let commodities = document.as_object().ok_or_else(|| {
            ForecastError::DataError("Expected a JSON object keyed by commodity".to_string())
        })?;

        let mut dataset = Dataset::new();
        for (commodity, years) in commodities {
            let Some(years) = years.as_object() else {
                warn!("Skipping '{}': expected an object keyed by year", commodity);
                continue;
            };

            let mut series = HistoricalSeries::new();
            let mut rejected = 0;
            for (year, records) in years {
                // Anything other than an array of records carries no observations
                let Some(records) = records.as_array() else {
                    debug!("Ignoring non-array year '{}' of '{}'", year, commodity);
                    continue;
                };

                let mut observations = Vec::with_capacity(records.len());
                for record in records {
                    match parse_json_record(record) {
                        Ok(observation) => observations.push(observation),
                        Err(err) => {
                            debug!("Dropping record of '{}' ({}): {}", commodity, year, err);
                            rejected += 1;
                        }
                    }
                }
                series.insert_year(year.as_str(), observations);
            }

            if rejected > 0 {
                warn!("Dropped {} malformed records of '{}'", rejected, commodity);
            }
            dataset.rejected_records += rejected;
            dataset.insert(commodity.as_str(), series);
        }

        Ok(dataset)
    }

    /// Load per-commodity CSV files laid out as `dir/<commodity>/<year>.csv`.
    ///
    /// Each file needs a header row with `date` and `price` columns. Files
    /// that cannot be read are logged and skipped; commodities without any
    /// usable file are left out of the dataset.
    pub fn from_cleaned_dir<P: AsRef<Path>>(dir: P) -> Result<Dataset> {
        let dir = dir.as_ref();
        let mut commodity_dirs = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                commodity_dirs.push(entry.path());
            }
        }
        commodity_dirs.sort();

        let mut dataset = Dataset::new();
        for commodity_dir in commodity_dirs {
            let Some(commodity) = file_name_string(&commodity_dir) else {
                continue;
            };

            let mut year_files: Vec<_> = fs::read_dir(&commodity_dir)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.extension().map_or(false, |ext| ext == "csv"))
                .collect();
            year_files.sort();

            let mut series = HistoricalSeries::new();
            let mut rejected = 0;
            for file in year_files {
                let Some(year) = file
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                else {
                    continue;
                };

                match read_year_csv(&file) {
                    Ok((observations, dropped)) => {
                        rejected += dropped;
                        if observations.is_empty() && dropped == 0 {
                            continue;
                        }
                        series.insert_year(year, observations);
                    }
                    Err(err) => warn!("Error processing {}: {}", file.display(), err),
                }
            }

            if rejected > 0 {
                warn!("Dropped {} malformed records of '{}'", rejected, commodity);
            }
            dataset.rejected_records += rejected;
            if series.years().next().is_some() {
                dataset.insert(commodity, series);
            }
        }

        info!(
            "Loaded {} commodities from {}",
            dataset.len(),
            dir.display()
        );
        Ok(dataset)
    }
}

fn parse_json_record(record: &Value) -> Result<PriceObservation> {
    let fields = record
        .as_object()
        .ok_or_else(|| ForecastError::DataError("record is not an object".to_string()))?;

    let date = fields
        .get("date")
        .and_then(Value::as_str)
        .ok_or_else(|| ForecastError::DataError("missing date".to_string()))?;
    let date = date_parser::parse_date(date)?;

    let price = fields
        .get("price")
        .and_then(Value::as_f64)
        .ok_or_else(|| ForecastError::DataError("missing or non-numeric price".to_string()))?;

    checked_observation(date, price)
}

fn checked_observation(date: NaiveDate, price: f64) -> Result<PriceObservation> {
    let observation = PriceObservation::new(date, price);
    if !observation.is_usable() {
        return Err(ForecastError::DataError(format!(
            "non-positive price {}",
            price
        )));
    }
    Ok(observation)
}

/// Read one `<year>.csv` file, returning usable observations and the number
/// of rows dropped
fn read_year_csv(path: &Path) -> Result<(Vec<PriceObservation>, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    };
    let (Some(date_idx), Some(price_idx)) = (column("date"), column("price")) else {
        return Err(ForecastError::DataError(
            "missing 'date' or 'price' column".to_string(),
        ));
    };

    let mut observations = Vec::new();
    let mut dropped = 0;
    for row in reader.records() {
        let parsed = row.map_err(ForecastError::from).and_then(|row| {
            let date = row
                .get(date_idx)
                .ok_or_else(|| ForecastError::DataError("missing date".to_string()))?;
            let date = date_parser::parse_date(date)?;
            let price = row
                .get(price_idx)
                .and_then(|price| price.parse::<f64>().ok())
                .ok_or_else(|| {
                    ForecastError::DataError("missing or non-numeric price".to_string())
                })?;
            checked_observation(date, price)
        });

        match parsed {
            Ok(observation) => observations.push(observation),
            Err(err) => {
                debug!("Dropping row of {}: {}", path.display(), err);
                dropped += 1;
            }
        }
    }

    Ok((observations, dropped))
}

fn file_name_string(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
