//! Annual inflation rates from a World Bank style table
//!
//! The table is wide: one row per country, identifying columns first
//! ("Country Name", "Country Code", ...) followed by one column per year.
//! Values are annual CPI changes in percent.

use crate::error::{RatemakingError, Result};
use csv::Reader;
use log::warn;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::Path;

/// Default inflation table location
pub const DEFAULT_INFLATION_PATH: &str = "data/inflation_rates.csv";

/// Country used when none is given
pub const DEFAULT_COUNTRY: &str = "United States";

/// Annual inflation rates (percent) keyed by calendar year
pub type InflationRates = BTreeMap<i32, f64>;

/// Load one country's annual inflation rates from a CSV file
pub fn load_inflation_rates<P: AsRef<Path>>(path: P, country: &str) -> Result<InflationRates> {
    read_country(Reader::from_path(path)?, country)
}

/// Load one country's annual inflation rates from any reader
pub fn load_inflation_rates_from_reader<R: std::io::Read>(
    reader: R,
    country: &str,
) -> Result<InflationRates> {
    read_country(Reader::from_reader(reader), country)
}

/// The same rate for every year in the range
pub fn flat_rates(years: RangeInclusive<i32>, rate: f64) -> InflationRates {
    years.map(|year| (year, rate)).collect()
}

fn read_country<R: std::io::Read>(mut reader: Reader<R>, country: &str) -> Result<InflationRates> {
    let headers = reader.headers()?.clone();
    let name_col = headers
        .iter()
        .position(|h| h.trim() == "Country Name")
        .ok_or_else(|| RatemakingError::InvalidInput("missing column: Country Name".to_string()))?;

    let year_cols: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| h.trim().parse::<i32>().ok().map(|year| (idx, year)))
        .collect();

    for result in reader.records() {
        let record = result?;
        if record.get(name_col).map(str::trim) != Some(country) {
            continue;
        }

        let mut rates = InflationRates::new();
        for &(idx, year) in &year_cols {
            let raw = record.get(idx).map(str::trim).unwrap_or("");
            if raw.is_empty() {
                continue;
            }
            match raw.parse::<f64>() {
                Ok(rate) => {
                    rates.insert(year, rate);
                }
                Err(_) => warn!("skipping unparseable inflation value {:?} for {}", raw, year),
            }
        }
        return Ok(rates);
    }

    Err(RatemakingError::InvalidInput(format!(
        "country not found in inflation table: {}",
        country
    )))
}
