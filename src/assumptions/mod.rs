//! Ratemaking assumptions: experience period, LDF selection, level change
//! schedules, provisions and trend dates

pub mod loader;

pub use loader::{
    load_change_schedule, load_change_schedule_from_reader, DEFAULT_ASSUMPTIONS_PATH,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

use crate::data::inflation::DEFAULT_COUNTRY;
use crate::data::PremiumBasis;
use crate::development::{AveragingMethod, DEFAULT_LATEST_N, DEFAULT_MATURITY_LAG, DEFAULT_TAIL_FACTOR};
use crate::error::{RatemakingError, Result};
use crate::onlevel::{period_start, ChangeEvent, ChangeSchedule};
use crate::trend::{Provisions, TrendBasis};

/// Rate and benefit changes assumed for the 1988-1997 experience
const ASSUMED_CHANGES: [(i32, u32, u32, f64); 5] = [
    (1988, 4, 1, 0.05),
    (1990, 7, 1, -0.02),
    (1991, 5, 1, 0.11),
    (1993, 8, 1, -0.05),
    (1996, 8, 1, 0.15),
];

/// Accident years analysed and the lag treated as fully developed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperiencePeriod {
    pub first_accident_year: i32,
    pub last_accident_year: i32,
    pub maturity_lag: u32,
}

impl Default for ExperiencePeriod {
    fn default() -> Self {
        Self {
            first_accident_year: 1988,
            last_accident_year: 1997,
            maturity_lag: DEFAULT_MATURITY_LAG,
        }
    }
}

impl ExperiencePeriod {
    pub fn accident_years(&self) -> RangeInclusive<i32> {
        self.first_accident_year..=self.last_accident_year
    }

    pub fn years(&self) -> Vec<i32> {
        self.accident_years().collect()
    }
}

/// How age-to-age factors are selected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LdfSelection {
    pub method: AveragingMethod,
    pub tail: f64,
    /// Most recent accident years included in each average
    pub latest_n: usize,
}

impl Default for LdfSelection {
    fn default() -> Self {
        Self {
            method: AveragingMethod::SimpleAvg,
            tail: DEFAULT_TAIL_FACTOR,
            latest_n: DEFAULT_LATEST_N,
        }
    }
}

/// Inflation source and the forecast period's average date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendAssumptions {
    /// Row of the inflation table to use
    pub country: String,
    /// Average accident / earned date of the future policy period; follows
    /// the experience period when omitted (see [`forecast_date_after`])
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_date: Option<NaiveDate>,
}

impl Default for TrendAssumptions {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            forecast_date: None,
        }
    }
}

/// Rates effective Jan 1 of the year after the experience, in force for a
/// year on annual policies: the average date falls a year after that
pub fn forecast_date_after(last_accident_year: i32) -> Result<NaiveDate> {
    period_start(last_accident_year.saturating_add(2))
}

/// Container for all ratemaking assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatemakingAssumptions {
    pub experience: ExperiencePeriod,
    pub selection: LdfSelection,
    pub premium_basis: PremiumBasis,
    /// Rate changes, applied to premium
    pub rate_changes: ChangeSchedule,
    /// Benefit changes, applied to losses
    pub benefit_changes: ChangeSchedule,
    pub provisions: Provisions,
    pub trend: TrendAssumptions,
}

impl RatemakingAssumptions {
    /// Pricing assumptions for the 1988-1997 workers' compensation study
    pub fn default_pricing() -> Self {
        Self {
            experience: ExperiencePeriod::default(),
            selection: LdfSelection::default(),
            premium_basis: PremiumBasis::Net,
            rate_changes: assumed_changes(),
            benefit_changes: assumed_changes(),
            provisions: Provisions::default(),
            trend: TrendAssumptions::default(),
        }
    }

    /// Load assumptions from a JSON file; omitted fields keep their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let assumptions: Self = serde_json::from_str(text)?;
        assumptions.validate()?;
        Ok(assumptions)
    }

    /// Load from the default location (data/assumptions.json)
    pub fn from_default_path() -> Result<Self> {
        Self::from_json_path(DEFAULT_ASSUMPTIONS_PATH)
    }

    /// Forecast average date: the configured one, else derived from the
    /// last accident year
    pub fn forecast_date(&self) -> Result<NaiveDate> {
        match self.trend.forecast_date {
            Some(date) => Ok(date),
            None => forecast_date_after(self.experience.last_accident_year),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let e = &self.experience;
        if e.last_accident_year < e.first_accident_year {
            return Err(RatemakingError::InvalidInput(format!(
                "experience period ends ({}) before it starts ({})",
                e.last_accident_year, e.first_accident_year
            )));
        }
        if self.selection.latest_n == 0 {
            return Err(RatemakingError::InvalidInput(
                "averaging window must include at least one year".to_string(),
            ));
        }
        if self.selection.tail <= 0.0 {
            return Err(RatemakingError::InvalidInput(format!(
                "tail factor must be positive, got {}",
                self.selection.tail
            )));
        }

        let forecast = self.forecast_date()?;
        let latest = TrendBasis::Loss.experience_date(e.last_accident_year)?;
        if forecast <= latest {
            return Err(RatemakingError::InvalidInput(format!(
                "forecast date {} must fall after {}, the average accident date of {}",
                forecast, latest, e.last_accident_year
            )));
        }
        Ok(())
    }
}

impl Default for RatemakingAssumptions {
    fn default() -> Self {
        Self::default_pricing()
    }
}

fn assumed_changes() -> ChangeSchedule {
    let events = ASSUMED_CHANGES
        .iter()
        .filter_map(|&(y, m, d, change)| {
            NaiveDate::from_ymd_opt(y, m, d).map(|date| ChangeEvent::new(date, change))
        })
        .collect();
    ChangeSchedule::new(events).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pricing() {
        let assumptions = RatemakingAssumptions::default_pricing();
        assert_eq!(assumptions.experience.years().len(), 10);
        assert_eq!(assumptions.selection.method, AveragingMethod::SimpleAvg);
        assert_eq!(assumptions.selection.tail, 1.0);
        assert_eq!(assumptions.selection.latest_n, 5);
        assert_eq!(assumptions.rate_changes.len(), 5);
        assert_eq!(assumptions.rate_changes, assumptions.benefit_changes);
        assert_eq!(assumptions.rate_changes.current_index(), 1.2478);
        assert_eq!(assumptions.trend.forecast_date, None);
        assert_eq!(
            assumptions.forecast_date().unwrap(),
            NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()
        );
        assert!(assumptions.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "selection": { "method": "VolumeAvg", "tail": 1.02 },
            "provisions": { "fixed_expense": 0.06, "variable_expense": 0.12, "profit": 0.05, "ulae_ratio": 0.04 },
            "rate_changes": [ { "effective_date": "1992-01-01", "change": 0.08 } ]
        }"#;
        let assumptions = RatemakingAssumptions::from_json_str(json).unwrap();

        assert_eq!(assumptions.selection.method, AveragingMethod::VolumeAvg);
        assert_eq!(assumptions.selection.tail, 1.02);
        assert_eq!(assumptions.selection.latest_n, 5);
        assert_eq!(assumptions.provisions.fixed_expense, 0.06);
        assert_eq!(assumptions.rate_changes.len(), 1);
        assert_eq!(assumptions.benefit_changes.len(), 5);
        assert_eq!(assumptions.experience.first_accident_year, 1988);
    }

    #[test]
    fn test_invalid_assumptions_rejected() {
        let json = r#"{ "experience": { "first_accident_year": 1997, "last_accident_year": 1988 } }"#;
        assert!(RatemakingAssumptions::from_json_str(json).is_err());

        let json = r#"{ "selection": { "latest_n": 0 } }"#;
        assert!(RatemakingAssumptions::from_json_str(json).is_err());
    }

    #[test]
    fn test_forecast_date_follows_experience_override() {
        let json = r#"{ "experience": { "first_accident_year": 1990, "last_accident_year": 1999 } }"#;
        let assumptions = RatemakingAssumptions::from_json_str(json).unwrap();
        assert_eq!(
            assumptions.forecast_date().unwrap(),
            NaiveDate::from_ymd_opt(2001, 1, 1).unwrap()
        );

        let latest = TrendBasis::Loss.experience_date(1999).unwrap();
        let period = crate::trend::trend_period(latest, assumptions.forecast_date().unwrap());
        assert_eq!(period, 1.5);
    }

    #[test]
    fn test_explicit_forecast_date_kept() {
        let json = r#"{ "trend": { "forecast_date": "2000-07-01" } }"#;
        let assumptions = RatemakingAssumptions::from_json_str(json).unwrap();
        assert_eq!(assumptions.trend.country, "United States");
        assert_eq!(
            assumptions.forecast_date().unwrap(),
            NaiveDate::from_ymd_opt(2000, 7, 1).unwrap()
        );
    }

    #[test]
    fn test_forecast_date_before_last_accident_year_rejected() {
        let json = r#"{
            "experience": { "first_accident_year": 1990, "last_accident_year": 1999 },
            "trend": { "forecast_date": "1999-01-01" }
        }"#;
        assert!(matches!(
            RatemakingAssumptions::from_json_str(json),
            Err(RatemakingError::InvalidInput(_))
        ));

        let json = r#"{ "trend": { "forecast_date": "1997-07-01" } }"#;
        assert!(RatemakingAssumptions::from_json_str(json).is_err());
    }

    #[test]
    fn test_forecast_date_after_out_of_range_year() {
        assert_eq!(
            forecast_date_after(1997).unwrap(),
            NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()
        );
        assert!(forecast_date_after(300_000).is_err());
    }

    #[test]
    fn test_default_file_matches_builtin() {
        let assumptions = RatemakingAssumptions::from_default_path().unwrap();
        assert_eq!(assumptions, RatemakingAssumptions::default_pricing());
    }

    #[test]
    fn test_round_trip_json() {
        let assumptions = RatemakingAssumptions::default_pricing();
        let json = serde_json::to_string(&assumptions).unwrap();
        let back = RatemakingAssumptions::from_json_str(&json).unwrap();
        assert_eq!(back, assumptions);
    }
}
