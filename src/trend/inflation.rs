//! Inflation trend periods and factors

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::InflationRates;
use crate::error::{RatemakingError, Result};
use crate::onlevel::years_between;

/// Which experience date a trend period starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendBasis {
    /// Average accident date of the accident year (July 1)
    Loss,
    /// Average earned date of calendar-year premium on annual policies (January 1)
    Premium,
}

impl TrendBasis {
    pub fn experience_date(&self, year: i32) -> Result<NaiveDate> {
        let month = match self {
            TrendBasis::Loss => 7,
            TrendBasis::Premium => 1,
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| RatemakingError::InvalidInput(format!("year out of range: {}", year)))
    }
}

/// For each year, the mean rate from that year through the last year given
pub fn trailing_average_rates(rates: &InflationRates, years: &[i32]) -> Result<Vec<(i32, f64)>> {
    let values = years
        .iter()
        .map(|&year| {
            rates.get(&year).copied().ok_or(RatemakingError::MissingPeriodValue {
                period: year,
                what: "inflation rate",
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(years
        .iter()
        .enumerate()
        .map(|(idx, &year)| {
            let tail = &values[idx..];
            (year, tail.iter().sum::<f64>() / tail.len() as f64)
        })
        .collect())
}

/// `(1 + rate%/100) ^ years`
pub fn inflation_trend_factor(avg_annual_rate_percent: f64, period_in_years: f64) -> f64 {
    (1.0 + 0.01 * avg_annual_rate_percent).powf(period_in_years)
}

/// Years from the experience date to the forecast date, counted in whole months
pub fn trend_period(experience_date: NaiveDate, forecast_date: NaiveDate) -> f64 {
    years_between(forecast_date, experience_date)
}

/// Trend inputs and factor for one experience year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendRow {
    pub year: i32,
    pub average_rate: f64,
    pub period: f64,
    pub factor: f64,
}

/// Trend factors for each (year, trailing average rate) pair
pub fn trend_factors(
    average_rates: &[(i32, f64)],
    forecast_date: NaiveDate,
    basis: TrendBasis,
) -> Result<Vec<TrendRow>> {
    average_rates
        .iter()
        .map(|&(year, average_rate)| {
            let period = trend_period(basis.experience_date(year)?, forecast_date);
            Ok(TrendRow {
                year,
                average_rate,
                period,
                factor: inflation_trend_factor(average_rate, period),
            })
        })
        .collect()
}

/// Multiply each (year, amount) by that year's trend factor
pub fn apply_trend(amounts: &[(i32, f64)], rows: &[TrendRow]) -> Result<Vec<(i32, f64)>> {
    amounts
        .iter()
        .map(|&(year, amount)| {
            let row = rows.iter().find(|r| r.year == year).ok_or(
                RatemakingError::MissingPeriodValue {
                    period: year,
                    what: "trend factor",
                },
            )?;
            Ok((year, amount * row.factor))
        })
        .collect()
}
