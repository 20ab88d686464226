//! Forward ratemaking pipeline for one company
//!
//! Losses are developed to ultimate with the chain-ladder method, restated at
//! the current benefit level and trended to the forecast period; earned
//! premium is restated at the current rate level and trended the same way.
//! The trended loss ratios then drive the overall indicated rate change.

use log::{debug, info, warn};

use crate::assumptions::RatemakingAssumptions;
use crate::data::{company_records, earned_premium, ClaimRecord, Company, InflationRates};
use crate::development::{
    actual_ultimates, build_triangle, compute_averaged_ldfs, compute_ldfs, project_ultimates,
    AveragingMethod, BacktestSummary, SelectedLdfs,
};
use crate::error::{RatemakingError, Result};
use crate::onlevel::OnLevelAnalysis;
use crate::trend::{apply_trend, loss_ratios, trailing_average_rates, trend_factors, RateIndication, TrendBasis};
use super::results::IndicationResult;

/// Runs indications under a fixed set of assumptions
#[derive(Debug, Clone)]
pub struct RatemakingEngine {
    assumptions: RatemakingAssumptions,
}

impl RatemakingEngine {
    pub fn new(assumptions: RatemakingAssumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &RatemakingAssumptions {
        &self.assumptions
    }

    /// Same assumptions with a different averaging method
    pub fn with_method(&self, method: AveragingMethod) -> Self {
        let mut assumptions = self.assumptions.clone();
        assumptions.selection.method = method;
        Self::new(assumptions)
    }

    /// Full indication for the company `grcode` in `records`
    pub fn run(
        &self,
        records: &[ClaimRecord],
        grcode: u32,
        inflation: &InflationRates,
    ) -> Result<IndicationResult> {
        self.assumptions.validate()?;
        let records = company_records(records, grcode);
        let first = records.first().ok_or_else(|| {
            RatemakingError::InvalidInput(format!("no records for company {}", grcode))
        })?;
        let company = Company {
            grcode,
            name: first.grname.clone(),
        };

        let a = &self.assumptions;
        let years = a.experience.years();
        let selection = a.selection;

        // Loss development
        let losses = build_triangle(&records, a.experience.accident_years())?;
        let ldfs = compute_ldfs(&losses)?;
        let averaged_ldfs = compute_averaged_ldfs(&ldfs, &losses, selection.latest_n)?;
        let selected = SelectedLdfs::select(&averaged_ldfs, selection.method, selection.tail);
        let cdfs = selected.cdfs();
        let projected_ultimates = project_ultimates(&losses, &cdfs)?;

        let actual = match actual_ultimates(&records, &years, a.experience.maturity_lag) {
            Ok(actual) => Some(actual),
            Err(RatemakingError::MissingObservation { accident_year, .. }) => {
                warn!(
                    "company {}: no loss at lag {} for {}, skipping back-test",
                    grcode, a.experience.maturity_lag, accident_year
                );
                None
            }
            Err(e) => return Err(e),
        };
        let backtest = actual
            .as_deref()
            .map(|actual| BacktestSummary::compare(&projected_ultimates, actual))
            .transpose()?;

        // Level adjustments
        let premium = earned_premium(&records, &years, a.premium_basis)?;
        let rate_level = OnLevelAnalysis::compute(&a.rate_changes, &years)?;
        let adjusted_premium = rate_level.adjust(&premium)?;
        let benefit_level = OnLevelAnalysis::compute(&a.benefit_changes, &years)?;
        let adjusted_losses = benefit_level.adjust(&projected_ultimates)?;

        // Inflation trend
        let average_inflation = trailing_average_rates(inflation, &years)?;
        let forecast = a.forecast_date()?;
        let loss_trend = trend_factors(&average_inflation, forecast, TrendBasis::Loss)?;
        let premium_trend = trend_factors(&average_inflation, forecast, TrendBasis::Premium)?;
        let trended_losses = apply_trend(&adjusted_losses, &loss_trend)?;
        let trended_premium = apply_trend(&adjusted_premium, &premium_trend)?;
        debug!(
            "company {}: trended {} years to {}",
            grcode,
            trended_losses.len(),
            forecast
        );

        let loss_ratios = loss_ratios(&trended_losses, &trended_premium)?;
        let indication = RateIndication::compute(&loss_ratios, &a.provisions)?;
        info!(
            "{} ({}): average loss ratio {:.4}, indicated change {:+.2}%",
            company.name,
            selection.method,
            indication.average_loss_ratio,
            indication.indicated_change * 100.0
        );

        Ok(IndicationResult {
            company,
            method: selection.method,
            losses,
            ldfs,
            averaged_ldfs,
            selected,
            cdfs,
            projected_ultimates,
            actual_ultimates: actual,
            backtest,
            earned_premium: premium,
            rate_level,
            adjusted_premium,
            benefit_level,
            adjusted_losses,
            average_inflation,
            loss_trend,
            premium_trend,
            trended_losses,
            trended_premium,
            loss_ratios,
            indication,
        })
    }

    /// Indicated rate change under each averaging method
    pub fn compare_methods(
        &self,
        records: &[ClaimRecord],
        grcode: u32,
        inflation: &InflationRates,
    ) -> Result<Vec<(AveragingMethod, f64)>> {
        AveragingMethod::ALL
            .iter()
            .map(|&method| {
                let result = self.with_method(method).run(records, grcode, inflation)?;
                Ok((method, result.indication.indicated_change))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::flat_rates;
    use crate::onlevel::ChangeSchedule;
    use approx::assert_abs_diff_eq;

    const PATTERN: [f64; 10] = [0.4, 0.6, 0.75, 0.85, 0.9, 0.94, 0.97, 0.99, 1.0, 1.0];

    /// Full ten-by-ten square with the same development pattern every year
    fn company(grcode: u32) -> Vec<ClaimRecord> {
        let mut records = Vec::new();
        for (i, ay) in (1988..=1997).enumerate() {
            let base = 1000.0 + 100.0 * i as f64;
            for lag in 1..=10u32 {
                records.push(ClaimRecord {
                    grcode,
                    grname: format!("Group {}", grcode),
                    accident_year: ay,
                    development_year: ay + lag as i32 - 1,
                    development_lag: lag,
                    cum_paid_loss: base * PATTERN[lag as usize - 1],
                    earned_prem_dir: base * 2.0,
                    earned_prem_net: base * 1.5,
                });
            }
        }
        records
    }

    fn flat_assumptions() -> RatemakingAssumptions {
        RatemakingAssumptions {
            rate_changes: ChangeSchedule::default(),
            benefit_changes: ChangeSchedule::default(),
            ..RatemakingAssumptions::default_pricing()
        }
    }

    #[test]
    fn test_run_on_stable_pattern() {
        let records = company(100);
        let engine = RatemakingEngine::new(flat_assumptions());
        let result = engine.run(&records, 100, &flat_rates(1988..=1997, 0.0)).unwrap();

        assert_eq!(result.losses.len(), 10);
        assert_eq!(result.cdfs.len(), 10);
        for (&(_, projected), &(_, actual)) in result
            .projected_ultimates
            .iter()
            .zip(result.actual_ultimates.as_ref().unwrap())
        {
            assert!((projected - actual).abs() / actual < 1e-3);
        }
        assert!(result.backtest.unwrap().r_squared > 0.999);

        // No changes and no inflation: loss ratio is ultimate over premium
        assert!(result.rate_level.rows.iter().all(|r| r.factor == 1.0));
        assert!(result.loss_trend.iter().all(|r| r.factor == 1.0));
        assert_abs_diff_eq!(result.indication.average_loss_ratio, 0.7, epsilon = 1e-3);
        assert_abs_diff_eq!(result.indication.indicated_change, 0.78 / 0.83 - 1.0, epsilon = 1e-3);
        assert!(result.indication.meets_profit_target);
        assert_eq!(result.summary_rows().len(), 10);
    }

    #[test]
    fn test_run_with_default_schedules_and_inflation() {
        let records = company(100);
        let engine = RatemakingEngine::new(RatemakingAssumptions::default_pricing());
        let result = engine.run(&records, 100, &flat_rates(1988..=1997, 3.0)).unwrap();

        // Current level exceeds every historical average level
        assert!(result.rate_level.rows.iter().all(|r| r.factor > 1.0));
        assert_eq!(result.rate_level, result.benefit_level);
        // Losses trend from mid-year, premium from the start of the year
        assert!(result.premium_trend[0].factor > result.loss_trend[0].factor);
        assert!(result.indication.indicated_change.is_finite());
    }

    #[test]
    fn test_shorter_experience_moves_forecast_date() {
        let mut assumptions = flat_assumptions();
        assumptions.experience.last_accident_year = 1996;
        let engine = RatemakingEngine::new(assumptions);
        let result = engine.run(&company(100), 100, &flat_rates(1988..=1996, 3.0)).unwrap();

        // 1998-01-01: a year and a half past the last average accident date
        let last_loss = result.loss_trend.last().unwrap();
        assert_eq!(last_loss.year, 1996);
        assert_eq!(last_loss.period, 1.5);
        assert!(last_loss.factor > 1.0);
        assert_eq!(result.premium_trend.last().unwrap().period, 2.0);

        let mut stale = engine.assumptions().clone();
        stale.trend.forecast_date = chrono::NaiveDate::from_ymd_opt(1996, 1, 1);
        assert!(matches!(
            RatemakingEngine::new(stale).run(&company(100), 100, &flat_rates(1988..=1996, 3.0)),
            Err(RatemakingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_maturity_skips_backtest() {
        // Keep only the observed triangle: lag 10 exists for 1988 alone
        let records: Vec<ClaimRecord> = company(100)
            .into_iter()
            .filter(|r| r.development_year <= 1997)
            .collect();
        let engine = RatemakingEngine::new(flat_assumptions());
        let result = engine.run(&records, 100, &flat_rates(1988..=1997, 0.0)).unwrap();
        assert!(result.actual_ultimates.is_none());
        assert!(result.backtest.is_none());
    }

    #[test]
    fn test_unknown_company_and_missing_inflation() {
        let records = company(100);
        let engine = RatemakingEngine::new(flat_assumptions());

        assert!(matches!(
            engine.run(&records, 999, &flat_rates(1988..=1997, 0.0)),
            Err(RatemakingError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.run(&records, 100, &flat_rates(1990..=1997, 0.0)),
            Err(RatemakingError::MissingPeriodValue { period: 1988, .. })
        ));
    }

    #[test]
    fn test_compare_methods_on_identical_factors() {
        let records = company(100);
        let engine = RatemakingEngine::new(flat_assumptions());
        let changes = engine
            .compare_methods(&records, 100, &flat_rates(1988..=1997, 0.0))
            .unwrap();

        assert_eq!(changes.len(), 4);
        for (_, change) in &changes {
            assert_abs_diff_eq!(*change, changes[0].1, epsilon = 1e-3);
        }
    }
}
