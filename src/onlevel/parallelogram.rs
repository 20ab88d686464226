//! Earned portions under stepped level changes (parallelogram method)
//!
//! Policies are annual and written uniformly, so earnings within a calendar
//! year form a parallelogram on the written-date / earned-date plane. A
//! level change on date `d` cuts that parallelogram along a diagonal; the
//! area on the earlier side is
//!
//! ```text
//! D = years from period start to d
//! A = D + T
//! B = max(A - E, 0)
//! C = max(D, 0)
//! P = 1 - (A² - B² - C²) / (2·E·T)
//! ```
//!
//! with `T` the policy term and `E` the period length (both one year).
//! Successive cuts turn the raw areas into the portion earned under each
//! regime.

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::schedule::{months_between, period_start, years_between, ChangeSchedule};
use crate::error::{RatemakingError, Result};
use crate::rounding::round5;

/// Policy term in years
pub const POLICY_TERM_YEARS: f64 = 1.0;

/// Length of the experience period in years
pub const PERIOD_LENGTH_YEARS: f64 = 1.0;

/// Largest tolerated deviation of a period's portions from 1.0
pub const PORTION_TOLERANCE: f64 = 1e-4;

/// Portion of each regime earned in one annual period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarnedPortions {
    pub period: i32,
    /// One entry per regime: before the first change, then after each change
    pub portions: Vec<f64>,
}

impl EarnedPortions {
    pub fn total(&self) -> f64 {
        self.portions.iter().sum()
    }
}

/// Area earned before a change on `change_date`, or `None` when the change
/// falls a year or more away from the period start
pub fn raw_portion(change_date: NaiveDate, start: NaiveDate) -> Option<f64> {
    let d = years_between(change_date, start);
    if d <= -POLICY_TERM_YEARS || d >= PERIOD_LENGTH_YEARS {
        return None;
    }

    let a = d + POLICY_TERM_YEARS;
    let b = (a - PERIOD_LENGTH_YEARS).max(0.0);
    let c = d.max(0.0);
    let p = 1.0 - (a.powi(2) - b.powi(2) - c.powi(2)) / (2.0 * PERIOD_LENGTH_YEARS * POLICY_TERM_YEARS);
    Some(round5(p))
}

/// Turn raw cut areas into per-regime portions
///
/// `raw` holds one entry per change event, zero where the event lies outside
/// the period's window. Each nonzero area is taken off a running remainder
/// (starting at 1.0); the remainder left after the last nonzero area belongs
/// to the regime that follows it. Output has one entry per regime, i.e.
/// `raw.len() + 1` when the nonzero areas are contiguous.
pub fn derive_segment_portions(raw: &[f64]) -> Vec<f64> {
    let mut portions = Vec::with_capacity(raw.len() + 2);
    let mut remaining = 1.0;

    for (idx, &area) in raw.iter().enumerate() {
        if area == 0.0 {
            portions.push(0.0);
            continue;
        }
        portions.push(round5(remaining - area));
        remaining = area;
        let next = raw.get(idx + 1).copied().unwrap_or(0.0);
        if next == 0.0 {
            portions.push(round5(remaining));
        }
    }

    // Sentinel; popped after any unaffected-period fallback is inserted
    portions.push(0.0);
    portions
}

/// Index of the regime in force at `start` when no change touches the period
fn unaffected_slot(dates: &[NaiveDate], start: NaiveDate) -> usize {
    dates
        .iter()
        .take_while(|&&d| months_between(d, start) <= 0)
        .count()
}

/// Earned portions for one period
pub fn period_portions(schedule: &ChangeSchedule, period: i32) -> Result<EarnedPortions> {
    let start = period_start(period)?;
    let dates = schedule.dates();

    let raw: Vec<f64> = dates
        .iter()
        .map(|&d| raw_portion(d, start).unwrap_or(0.0))
        .collect();

    let mut portions = derive_segment_portions(&raw);
    if portions.iter().all(|&p| p == 0.0) {
        let slot = unaffected_slot(&dates, start);
        debug!("period {} untouched by changes; full weight on regime {}", period, slot);
        portions.insert(slot, 1.0);
    }
    portions.pop();

    check_allocation(EarnedPortions { period, portions })
}

/// Reject portions that do not account for the whole period
pub fn check_allocation(earned: EarnedPortions) -> Result<EarnedPortions> {
    let total = earned.total();
    if (total - 1.0).abs() > PORTION_TOLERANCE {
        warn!("portions for {} sum to {:.5}", earned.period, total);
        return Err(RatemakingError::UnallocatedPeriod {
            period: earned.period,
            total,
        });
    }
    Ok(earned)
}

/// Earned portions for every period, in the order given
pub fn allocate_portions(schedule: &ChangeSchedule, periods: &[i32]) -> Result<Vec<EarnedPortions>> {
    periods
        .iter()
        .map(|&period| period_portions(schedule, period))
        .collect()
}
