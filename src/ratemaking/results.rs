//! Indication output: every intermediate table plus per-year and headline summaries

use serde::{Deserialize, Serialize};

use crate::data::Company;
use crate::development::{AveragedLdfs, AveragingMethod, BacktestSummary, CdfVector, SelectedLdfs, Triangle};
use crate::onlevel::OnLevelAnalysis;
use crate::trend::{RateIndication, TrendRow};

/// Complete result of one company's indication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicationResult {
    pub company: Company,
    pub method: AveragingMethod,

    /// Cumulative paid loss triangle
    pub losses: Triangle,
    /// Age-to-age factor triangle
    pub ldfs: Triangle,
    pub averaged_ldfs: AveragedLdfs,
    pub selected: SelectedLdfs,
    pub cdfs: CdfVector,

    /// Chain-ladder ultimates by accident year
    pub projected_ultimates: Vec<(i32, f64)>,
    /// Losses at the maturity lag, when the dataset reaches it
    pub actual_ultimates: Option<Vec<(i32, f64)>>,
    pub backtest: Option<BacktestSummary>,

    pub earned_premium: Vec<(i32, f64)>,
    /// Rate level on-level factors
    pub rate_level: OnLevelAnalysis,
    pub adjusted_premium: Vec<(i32, f64)>,
    /// Benefit level on-level factors
    pub benefit_level: OnLevelAnalysis,
    pub adjusted_losses: Vec<(i32, f64)>,

    /// Trailing average inflation rate (percent) per experience year
    pub average_inflation: Vec<(i32, f64)>,
    pub loss_trend: Vec<TrendRow>,
    pub premium_trend: Vec<TrendRow>,
    pub trended_losses: Vec<(i32, f64)>,
    pub trended_premium: Vec<(i32, f64)>,

    pub loss_ratios: Vec<(i32, f64)>,
    pub indication: RateIndication,
}

/// One accident year's path from raw to trended values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub accident_year: i32,
    pub earned_premium: f64,
    pub adjusted_premium: f64,
    pub trended_premium: f64,
    pub projected_ultimate: f64,
    pub adjusted_loss: f64,
    pub trended_loss: f64,
    pub loss_ratio: f64,
}

/// Headline figures for batch output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicationSummary {
    pub grcode: u32,
    pub name: String,
    pub method: AveragingMethod,
    pub average_loss_ratio: f64,
    pub permissible_loss_ratio: f64,
    pub indicated_change: f64,
    pub meets_profit_target: bool,
    pub r_squared: Option<f64>,
}

fn lookup(values: &[(i32, f64)], year: i32) -> f64 {
    values
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, v)| *v)
        .unwrap_or(f64::NAN)
}

impl IndicationResult {
    /// Per-year table; a value absent for a year shows as NaN
    pub fn summary_rows(&self) -> Vec<YearSummary> {
        self.losses
            .accident_years()
            .into_iter()
            .map(|year| YearSummary {
                accident_year: year,
                earned_premium: lookup(&self.earned_premium, year),
                adjusted_premium: lookup(&self.adjusted_premium, year),
                trended_premium: lookup(&self.trended_premium, year),
                projected_ultimate: lookup(&self.projected_ultimates, year),
                adjusted_loss: lookup(&self.adjusted_losses, year),
                trended_loss: lookup(&self.trended_losses, year),
                loss_ratio: lookup(&self.loss_ratios, year),
            })
            .collect()
    }

    pub fn summary(&self) -> IndicationSummary {
        IndicationSummary {
            grcode: self.company.grcode,
            name: self.company.name.clone(),
            method: self.method,
            average_loss_ratio: self.indication.average_loss_ratio,
            permissible_loss_ratio: self.indication.permissible_loss_ratio,
            indicated_change: self.indication.indicated_change,
            meets_profit_target: self.indication.meets_profit_target,
            r_squared: self.backtest.map(|b| b.r_squared),
        }
    }
}
