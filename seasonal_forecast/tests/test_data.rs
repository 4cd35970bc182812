use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use seasonal_forecast::data::{DataLoader, HistoricalSeries, PriceObservation};
use seasonal_forecast::{ForecastError, MonthDay};
use std::fs;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn test_json_loader_filters_malformed_records() {
    let document = r#"{
        "Tomato": {
            "2023": [
                {"date": "2023-01-01", "price": 10, "commodity": "Tomato"},
                {"date": "2023-01-02", "price": 0},
                {"date": "2023-01-03", "price": -4.5},
                {"date": "2023-01-04", "price": "n/a"},
                {"date": "2023-01-05"},
                {"date": "not-a-date", "price": 12},
                {"price": 12},
                "garbage"
            ],
            "2024": [
                {"date": "2024-01-01T00:00:00.000Z", "price": 14.25}
            ],
            "notes": "imported from spreadsheet"
        },
        "Onion": {}
    }"#;

    let dataset = DataLoader::from_json_str(document).unwrap();

    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.rejected_records(), 7);

    let tomato = dataset.get("Tomato").unwrap();
    let observations: Vec<PriceObservation> = tomato.observations().copied().collect();
    assert_eq!(
        observations,
        vec![
            PriceObservation::new(date(2023, 1, 1), 10.0),
            PriceObservation::new(date(2024, 1, 1), 14.25),
        ]
    );

    let onion = dataset.get("Onion").unwrap();
    assert!(onion.is_empty());
}

#[test]
fn test_json_loader_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"Rice": {{"2022": [{{"date": "2022-05-01", "price": 42.0}}]}}}}"#
    )
    .unwrap();

    let dataset = DataLoader::from_json(file.path()).unwrap();
    let names: Vec<&str> = dataset.commodities().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["Rice"]);
}

#[test]
fn test_json_loader_errors() {
    let result = DataLoader::from_json("/nonexistent/cleaned.json");
    assert!(matches!(result, Err(ForecastError::IoError(_))));

    let result = DataLoader::from_json_str("[1, 2, 3]");
    assert!(matches!(result, Err(ForecastError::DataError(_))));

    let result = DataLoader::from_json_str("{ not json");
    assert!(matches!(result, Err(ForecastError::JsonError(_))));
}

#[test]
fn test_cleaned_dir_loader() {
    let dir = tempdir().unwrap();

    let tomato = dir.path().join("Tomato");
    fs::create_dir(&tomato).unwrap();
    fs::write(
        tomato.join("2023.csv"),
        "\"date\",\"price\",\"market\"\n\"2023-01-01\",\"10.5\",\"Divisoria\"\n2023-01-02,oops,Divisoria\n",
    )
    .unwrap();
    fs::write(tomato.join("2024.csv"), "Date,Price\n2024-01-01, 12\n").unwrap();
    fs::write(tomato.join("README.txt"), "not a year file").unwrap();

    let empty = dir.path().join("Empty");
    fs::create_dir(&empty).unwrap();

    let broken = dir.path().join("Broken");
    fs::create_dir(&broken).unwrap();
    fs::write(broken.join("2023.csv"), "day,value\n2023-01-01,1\n").unwrap();

    let dataset = DataLoader::from_cleaned_dir(dir.path()).unwrap();

    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.rejected_records(), 1);

    let series = dataset.get("Tomato").unwrap();
    let years: Vec<&str> = series.years().map(|(year, _)| year).collect();
    assert_eq!(years, vec!["2023", "2024"]);
    assert_eq!(
        series.prices_on(MonthDay::new(1, 1).unwrap()),
        vec![10.5, 12.0]
    );
}

#[test]
fn test_cleaned_dir_missing() {
    let result = DataLoader::from_cleaned_dir("/nonexistent/cleaned");
    assert!(matches!(result, Err(ForecastError::IoError(_))));
}

#[test]
fn test_historical_series_operations() {
    let series = HistoricalSeries::from_observations(vec![
        PriceObservation::new(date(2022, 7, 4), 30.0),
        PriceObservation::new(date(2023, 7, 4), 0.0),
        PriceObservation::new(date(2023, 7, 5), 31.0),
        PriceObservation::new(date(2024, 7, 4), 34.0),
    ]);

    assert_eq!(series.len(), 4);
    assert!(!series.is_empty());
    assert_eq!(series.years().count(), 3);
    assert_eq!(series.latest_date(), Some(date(2024, 7, 4)));

    // Zero prices never count as observations
    assert_eq!(
        series.prices_on(MonthDay::new(7, 4).unwrap()),
        vec![30.0, 34.0]
    );
    assert!(series.prices_on(MonthDay::new(12, 25).unwrap()).is_empty());
}
