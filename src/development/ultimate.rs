//! Cumulative development factors and projected ultimate losses

use serde::{Deserialize, Serialize};

use super::averaging::AveragingMethod;
use super::factors::AveragedLdfs;
use super::triangle::Triangle;
use crate::data::ClaimRecord;
use crate::error::{RatemakingError, Result};
use crate::rounding::round4;

/// Default tail factor beyond the last observed age
pub const DEFAULT_TAIL_FACTOR: f64 = 1.0;

/// Lag at which a ten-year triangle is fully developed
pub const DEFAULT_MATURITY_LAG: u32 = 10;

/// One averaging method's factors with the tail appended, in development-age order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedLdfs {
    pub method: AveragingMethod,
    pub tail: f64,
    /// Age-to-age factors 12-24, 24-36, ..., then the tail
    pub factors: Vec<f64>,
}

impl SelectedLdfs {
    pub fn select(averaged: &AveragedLdfs, method: AveragingMethod, tail: f64) -> Self {
        let mut factors = averaged.get(method).to_vec();
        factors.push(tail);
        Self { method, tail, factors }
    }

    /// Chain the selection into cumulative development factors
    pub fn cdfs(&self) -> CdfVector {
        let without_tail = self.factors.split_last().map_or(&[][..], |(_, rest)| rest);
        compute_cdfs(without_tail, self.tail)
    }
}

/// Cumulative development factors aligned with triangle rows
///
/// Entry `i` develops row `i` (oldest accident year first) from its latest
/// age to ultimate: entry 0 is the tail alone, the last entry chains every
/// factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdfVector {
    pub factors: Vec<f64>,
}

impl CdfVector {
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Same factors ordered by development age: 12-ult, 24-ult, ...
    pub fn by_age(&self) -> Vec<f64> {
        self.factors.iter().rev().copied().collect()
    }
}

/// Append the tail, reverse, and take running products rounded to four decimals
pub fn compute_cdfs(selected: &[f64], tail: f64) -> CdfVector {
    let mut reversed: Vec<f64> = selected.to_vec();
    reversed.push(tail);
    reversed.reverse();

    CdfVector {
        factors: cumulative_products(&reversed),
    }
}

/// Running products, each rounded to four decimals while the chain stays unrounded
pub fn cumulative_products(factors: &[f64]) -> Vec<f64> {
    factors
        .iter()
        .scan(1.0, |product, &f| {
            *product *= f;
            Some(round4(*product))
        })
        .collect()
}

/// Latest diagonal times the positionally matching CDF
pub fn project_ultimates(losses: &Triangle, cdfs: &CdfVector) -> Result<Vec<(i32, f64)>> {
    if losses.len() != cdfs.len() {
        return Err(RatemakingError::LengthMismatch {
            left: losses.len(),
            right: cdfs.len(),
            context: "triangle rows vs CDFs",
        });
    }

    losses
        .rows()
        .iter()
        .zip(&cdfs.factors)
        .map(|(row, cdf)| {
            let latest = row.latest().ok_or(RatemakingError::EmptyInputSequence {
                context: "triangle row",
            })?;
            Ok((row.accident_year, round4(latest * cdf)))
        })
        .collect()
}

/// Cumulative paid loss at the maturity lag for each accident year
pub fn actual_ultimates(
    records: &[ClaimRecord],
    years: &[i32],
    maturity_lag: u32,
) -> Result<Vec<(i32, f64)>> {
    years
        .iter()
        .map(|&year| {
            records
                .iter()
                .find(|r| r.accident_year == year && r.development_lag == maturity_lag)
                .map(|r| (year, r.cum_paid_loss))
                .ok_or(RatemakingError::MissingObservation {
                    accident_year: year,
                    development_year: year + maturity_lag as i32 - 1,
                })
        })
        .collect()
}

/// Fit of projected against actual ultimates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub mean_absolute_error: f64,
    pub r_squared: f64,
}

impl BacktestSummary {
    /// Compare by accident year; both inputs must cover the same years in the same order
    pub fn compare(projected: &[(i32, f64)], actual: &[(i32, f64)]) -> Result<Self> {
        if projected.is_empty() {
            return Err(RatemakingError::EmptyInputSequence { context: "back-test" });
        }
        if projected.len() != actual.len() {
            return Err(RatemakingError::LengthMismatch {
                left: projected.len(),
                right: actual.len(),
                context: "projected vs actual ultimates",
            });
        }
        if let Some(((year, _), _)) = projected.iter().zip(actual).find(|(p, a)| p.0 != a.0) {
            return Err(RatemakingError::InvalidInput(format!(
                "accident year {} not aligned in back-test",
                year
            )));
        }

        let n = actual.len() as f64;
        let mean_actual = actual.iter().map(|(_, a)| a).sum::<f64>() / n;

        let mut abs_error = 0.0;
        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for ((_, p), (_, a)) in projected.iter().zip(actual) {
            abs_error += (a - p).abs();
            ss_res += (a - p).powi(2);
            ss_tot += (a - mean_actual).powi(2);
        }

        let r_squared = if ss_tot == 0.0 {
            if ss_res == 0.0 { 1.0 } else { 0.0 }
        } else {
            1.0 - ss_res / ss_tot
        };

        Ok(Self {
            mean_absolute_error: abs_error / n,
            r_squared,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cumulative_products_of_reversed_vector() {
        let cdfs = cumulative_products(&[1.1667, 1.5, 1.0]);
        assert_eq!(cdfs[0], 1.1667);
        assert_abs_diff_eq!(cdfs[1], 1.75, epsilon = 2e-4);
        assert_eq!(cdfs[1], cdfs[2]);
    }

    #[test]
    fn test_projects_single_row_to_ultimate() {
        let losses = Triangle::from_rows(vec![(2001, vec![100.0, 150.0, 175.0])]).unwrap();
        let cdfs = CdfVector { factors: vec![1.75] };

        let ultimates = project_ultimates(&losses, &cdfs).unwrap();
        assert_eq!(ultimates.len(), 1);
        assert_eq!(ultimates[0].0, 2001);
        assert_abs_diff_eq!(ultimates[0].1, 306.25, epsilon = 1e-9);
    }

    #[test]
    fn test_cdfs_align_with_rows() {
        let losses = Triangle::from_rows(vec![
            (2001, vec![100.0, 150.0, 175.0]),
            (2002, vec![120.0, 180.0]),
            (2003, vec![130.0]),
        ])
        .unwrap();

        let cdfs = compute_cdfs(&[1.5, 1.2], 1.05);
        assert_eq!(cdfs.factors, vec![1.05, 1.26, 1.89]);
        assert_eq!(cdfs.by_age(), vec![1.89, 1.26, 1.05]);

        let ultimates = project_ultimates(&losses, &cdfs).unwrap();
        assert_eq!(ultimates[0].0, 2001);
        assert_abs_diff_eq!(ultimates[0].1, 183.75, epsilon = 1e-9);
        assert_abs_diff_eq!(ultimates[1].1, 226.8, epsilon = 1e-9);
        assert_abs_diff_eq!(ultimates[2].1, 245.7, epsilon = 1e-9);
    }

    #[test]
    fn test_cdfs_move_away_from_one() {
        let cdfs = compute_cdfs(&[1.9, 1.3, 1.1, 1.04, 1.0], 1.02);
        for pair in cdfs.factors.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(cdfs.factors.iter().all(|&f| f >= 1.0));
    }

    #[test]
    fn test_selection_appends_tail() {
        let averaged = AveragedLdfs {
            simple: vec![1.5, 1.2],
            volume: vec![1.4, 1.1],
            medial: vec![1.5, 1.2],
            geometric: vec![1.45, 1.19],
        };
        let selected = SelectedLdfs::select(&averaged, AveragingMethod::VolumeAvg, 1.0);
        assert_eq!(selected.factors, vec![1.4, 1.1, 1.0]);
        assert_eq!(selected.cdfs().factors, vec![1.0, 1.1, 1.54]);
    }

    #[test]
    fn test_projection_length_mismatch() {
        let losses = Triangle::from_rows(vec![(2001, vec![100.0])]).unwrap();
        let cdfs = compute_cdfs(&[1.5], 1.0);
        assert!(matches!(
            project_ultimates(&losses, &cdfs),
            Err(RatemakingError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_actual_ultimates_at_maturity() {
        let records: Vec<ClaimRecord> = (1..=3)
            .map(|lag| ClaimRecord {
                grcode: 388,
                grname: "Federal Ins Co Grp".to_string(),
                accident_year: 1990,
                development_year: 1989 + lag as i32,
                development_lag: lag,
                cum_paid_loss: 100.0 * lag as f64,
                earned_prem_dir: 0.0,
                earned_prem_net: 0.0,
            })
            .collect();

        assert_eq!(actual_ultimates(&records, &[1990], 3).unwrap(), vec![(1990, 300.0)]);
        assert!(matches!(
            actual_ultimates(&records, &[1991], 3),
            Err(RatemakingError::MissingObservation { accident_year: 1991, development_year: 1993 })
        ));
    }

    #[test]
    fn test_backtest_summary() {
        let actual = vec![(1990, 100.0), (1991, 200.0), (1992, 300.0)];
        let exact = BacktestSummary::compare(&actual, &actual).unwrap();
        assert_eq!(exact.mean_absolute_error, 0.0);
        assert_eq!(exact.r_squared, 1.0);

        let projected = vec![(1990, 110.0), (1991, 190.0), (1992, 300.0)];
        let summary = BacktestSummary::compare(&projected, &actual).unwrap();
        assert_abs_diff_eq!(summary.mean_absolute_error, 20.0 / 3.0, epsilon = 1e-12);
        // 1 - 200 / 20000
        assert_abs_diff_eq!(summary.r_squared, 0.99, epsilon = 1e-12);
    }
}
