//! Expense and profit provisions and the overall indicated rate change

use serde::{Deserialize, Serialize};

use crate::error::{RatemakingError, Result};

/// Expense, profit and loss adjustment expense loadings, as fractions of premium
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Provisions {
    pub fixed_expense: f64,
    pub variable_expense: f64,
    pub profit: f64,
    /// Unallocated loss adjustment expense as a ratio to losses
    pub ulae_ratio: f64,
}

impl Default for Provisions {
    fn default() -> Self {
        Self {
            fixed_expense: 0.08,
            variable_expense: 0.10,
            profit: 0.07,
            ulae_ratio: 0.05,
        }
    }
}

impl Provisions {
    /// 1 - (variable expense + profit)
    pub fn permissible_loss_ratio(&self) -> f64 {
        1.0 - (self.variable_expense + self.profit)
    }
}

/// ((loss ratio + fixed expense) / (1 - variable expense - profit)) - 1
pub fn indicated_rate_change(
    avg_trended_loss_ratio: f64,
    fixed_expense_provision: f64,
    variable_expense_provision: f64,
    profit_provision: f64,
) -> Result<f64> {
    let permissible = 1.0 - variable_expense_provision - profit_provision;
    if permissible == 0.0 {
        return Err(RatemakingError::DivisionByZero {
            context: "indicated rate change".to_string(),
        });
    }
    Ok((avg_trended_loss_ratio + fixed_expense_provision) / permissible - 1.0)
}

/// Loss ratio per year: losses over premium for the same year
pub fn loss_ratios(losses: &[(i32, f64)], premiums: &[(i32, f64)]) -> Result<Vec<(i32, f64)>> {
    losses
        .iter()
        .map(|&(year, loss)| {
            let premium = premiums
                .iter()
                .find(|(y, _)| *y == year)
                .map(|(_, p)| *p)
                .ok_or(RatemakingError::MissingPeriodValue {
                    period: year,
                    what: "trended premium",
                })?;
            if premium == 0.0 {
                return Err(RatemakingError::DivisionByZero {
                    context: format!("loss ratio for {}", year),
                });
            }
            Ok((year, loss / premium))
        })
        .collect()
}

/// Arithmetic mean of the yearly loss ratios, loaded for ULAE
pub fn average_loss_ratio(ratios: &[(i32, f64)], ulae_ratio: f64) -> Result<f64> {
    if ratios.is_empty() {
        return Err(RatemakingError::EmptyInputSequence { context: "loss ratios" });
    }
    let mean = ratios.iter().map(|(_, r)| r).sum::<f64>() / ratios.len() as f64;
    Ok(mean * (1.0 + ulae_ratio))
}

/// Final rate level indication
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateIndication {
    /// Average trended loss and LAE ratio
    pub average_loss_ratio: f64,
    pub permissible_loss_ratio: f64,
    pub indicated_change: f64,
    /// Average loss ratio at or below the permissible loss ratio
    pub meets_profit_target: bool,
}

impl RateIndication {
    pub fn compute(ratios: &[(i32, f64)], provisions: &Provisions) -> Result<Self> {
        let average_loss_ratio = average_loss_ratio(ratios, provisions.ulae_ratio)?;
        let permissible_loss_ratio = provisions.permissible_loss_ratio();
        let indicated_change = indicated_rate_change(
            average_loss_ratio,
            provisions.fixed_expense,
            provisions.variable_expense,
            provisions.profit,
        )?;

        Ok(Self {
            average_loss_ratio,
            permissible_loss_ratio,
            indicated_change,
            meets_profit_target: average_loss_ratio <= permissible_loss_ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_indicated_rate_change() {
        let change = indicated_rate_change(0.65, 0.08, 0.10, 0.07).unwrap();
        assert_abs_diff_eq!(change, 0.73 / 0.83 - 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(change, -0.1205, epsilon = 1e-4);

        assert!(matches!(
            indicated_rate_change(0.65, 0.08, 0.5, 0.5),
            Err(RatemakingError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_permissible_loss_ratio() {
        assert_abs_diff_eq!(Provisions::default().permissible_loss_ratio(), 0.83, epsilon = 1e-12);
    }

    #[test]
    fn test_loss_ratios_and_average() {
        let losses = vec![(1996, 600.0), (1997, 700.0)];
        let premiums = vec![(1996, 1000.0), (1997, 1000.0)];
        let ratios = loss_ratios(&losses, &premiums).unwrap();
        assert_eq!(ratios, vec![(1996, 0.6), (1997, 0.7)]);

        let avg = average_loss_ratio(&ratios, 0.05).unwrap();
        assert_abs_diff_eq!(avg, 0.65 * 1.05, epsilon = 1e-12);

        assert!(loss_ratios(&losses, &[(1996, 1000.0)]).is_err());
        assert!(loss_ratios(&[(1996, 1.0)], &[(1996, 0.0)]).is_err());
        assert!(average_loss_ratio(&[], 0.05).is_err());
    }

    #[test]
    fn test_rate_indication() {
        let ratios = vec![(1996, 0.6), (1997, 0.7)];
        let provisions = Provisions { ulae_ratio: 0.0, ..Provisions::default() };

        let indication = RateIndication::compute(&ratios, &provisions).unwrap();
        assert_abs_diff_eq!(indication.average_loss_ratio, 0.65, epsilon = 1e-12);
        assert_abs_diff_eq!(indication.indicated_change, 0.73 / 0.83 - 1.0, epsilon = 1e-12);
        assert!(indication.meets_profit_target);

        let ratios = vec![(1996, 0.9)];
        let indication = RateIndication::compute(&ratios, &provisions).unwrap();
        assert!(!indication.meets_profit_target);
        assert!(indication.indicated_change > 0.0);
    }
}
