//! Average level indices and on-level factors

use log::debug;
use serde::{Deserialize, Serialize};

use super::parallelogram::{allocate_portions, EarnedPortions};
use super::schedule::ChangeSchedule;
use crate::error::{RatemakingError, Result};
use crate::rounding::round5;

/// Portion-weighted average of the cumulative indices, rounded to five decimals
pub fn average_cumulative_index(portions: &[f64], cumulative_indices: &[f64]) -> Result<f64> {
    if portions.len() != cumulative_indices.len() {
        return Err(RatemakingError::LengthMismatch {
            left: portions.len(),
            right: cumulative_indices.len(),
            context: "portions vs cumulative indices",
        });
    }
    let weighted: f64 = portions
        .iter()
        .zip(cumulative_indices)
        .map(|(p, idx)| p * idx)
        .sum();
    Ok(round5(weighted))
}

/// Current level over the average earned level, rounded to five decimals
pub fn on_level_factor(current_index: f64, average_index: f64) -> Result<f64> {
    if average_index == 0.0 {
        return Err(RatemakingError::DivisionByZero {
            context: "on-level factor".to_string(),
        });
    }
    Ok(round5(current_index / average_index))
}

/// Historical amount restated at the current level
pub fn adjusted_value(raw: f64, factor: f64) -> f64 {
    round5(raw * factor)
}

/// On-level result for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnLevelRow {
    pub period: i32,
    pub portions: Vec<f64>,
    pub average_index: f64,
    pub factor: f64,
}

/// Portions, average indices and factors for a schedule over a set of periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnLevelAnalysis {
    pub cumulative_indices: Vec<f64>,
    pub current_index: f64,
    pub rows: Vec<OnLevelRow>,
}

impl OnLevelAnalysis {
    pub fn compute(schedule: &ChangeSchedule, periods: &[i32]) -> Result<Self> {
        let cumulative_indices = schedule.cumulative_indices();
        let current_index = schedule.current_index();

        let rows = allocate_portions(schedule, periods)?
            .into_iter()
            .map(|EarnedPortions { period, portions }| {
                let average_index = average_cumulative_index(&portions, &cumulative_indices)?;
                let factor = on_level_factor(current_index, average_index)?;
                Ok(OnLevelRow { period, portions, average_index, factor })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "on-level factors for {} periods against current index {}",
            rows.len(),
            current_index
        );
        Ok(Self { cumulative_indices, current_index, rows })
    }

    pub fn factor(&self, period: i32) -> Option<f64> {
        self.rows.iter().find(|r| r.period == period).map(|r| r.factor)
    }

    /// Restate (period, amount) pairs at the current level
    pub fn adjust(&self, amounts: &[(i32, f64)]) -> Result<Vec<(i32, f64)>> {
        amounts
            .iter()
            .map(|&(period, raw)| {
                let factor = self.factor(period).ok_or(RatemakingError::MissingPeriodValue {
                    period,
                    what: "on-level factor",
                })?;
                Ok((period, adjusted_value(raw, factor)))
            })
            .collect()
    }
}
