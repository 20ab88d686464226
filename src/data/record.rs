//! Claim records matching the Schedule P workers' compensation format

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{RatemakingError, Result};

/// Which earned premium column feeds the loss ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PremiumBasis {
    /// Net of ceded reinsurance (EarnedPremNet_D)
    #[default]
    Net,
    /// Direct and assumed (EarnedPremDIR_D)
    Direct,
}

impl PremiumBasis {
    pub fn column(&self) -> &'static str {
        match self {
            PremiumBasis::Net => "EarnedPremNet_D",
            PremiumBasis::Direct => "EarnedPremDIR_D",
        }
    }
}

impl FromStr for PremiumBasis {
    type Err = RatemakingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "net" | "earnedpremnet_d" => Ok(PremiumBasis::Net),
            "direct" | "dir" | "earnedpremdir_d" => Ok(PremiumBasis::Direct),
            other => Err(RatemakingError::InvalidInput(format!(
                "unknown premium basis: {}",
                other
            ))),
        }
    }
}

/// One row of the dataset: a company's position for an accident year at a development lag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// NAIC group code
    pub grcode: u32,

    /// Group name
    pub grname: String,

    pub accident_year: i32,

    /// Calendar year of evaluation
    pub development_year: i32,

    /// Development lag in years (1 = first evaluation)
    pub development_lag: u32,

    /// Cumulative paid losses and defense and cost containment expenses
    pub cum_paid_loss: f64,

    /// Earned premium, direct and assumed
    pub earned_prem_dir: f64,

    /// Earned premium, net of reinsurance
    pub earned_prem_net: f64,
}

impl ClaimRecord {
    /// Earned premium on the requested basis
    pub fn earned_premium(&self, basis: PremiumBasis) -> f64 {
        match basis {
            PremiumBasis::Net => self.earned_prem_net,
            PremiumBasis::Direct => self.earned_prem_dir,
        }
    }
}

/// Company identifier and display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub grcode: u32,
    pub name: String,
}

impl Company {
    /// "GRCODE-GRNAME" label used in company listings
    pub fn label(&self) -> String {
        format!("{}-{}", self.grcode, self.name)
    }
}

/// Groups used for the sample indications
pub const SAMPLE_COMPANIES: [(u32, &str); 5] = [
    (86, "Allstate Ins Co Grp"),
    (337, "California Cas Grp"),
    (353, "Celina Mut Grp"),
    (388, "Federal Ins Co Grp"),
    (671, "Farm Bureau of MI Grp"),
];

/// Records belonging to a single company
pub fn company_records(records: &[ClaimRecord], grcode: u32) -> Vec<ClaimRecord> {
    records
        .iter()
        .filter(|r| r.grcode == grcode)
        .cloned()
        .collect()
}

/// Distinct companies in first-seen order
pub fn list_companies(records: &[ClaimRecord]) -> Vec<Company> {
    let mut companies: Vec<Company> = Vec::new();
    for record in records {
        if !companies.iter().any(|c| c.grcode == record.grcode) {
            companies.push(Company {
                grcode: record.grcode,
                name: record.grname.clone(),
            });
        }
    }
    companies
}

/// Earned premium per accident year, taken from the first record of each year
pub fn earned_premium(
    records: &[ClaimRecord],
    years: &[i32],
    basis: PremiumBasis,
) -> Result<Vec<(i32, f64)>> {
    years
        .iter()
        .map(|&year| {
            records
                .iter()
                .find(|r| r.accident_year == year)
                .map(|r| (year, r.earned_premium(basis)))
                .ok_or(RatemakingError::MissingPeriodValue {
                    period: year,
                    what: "earned premium",
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(grcode: u32, ay: i32, lag: u32, loss: f64) -> ClaimRecord {
        ClaimRecord {
            grcode,
            grname: format!("Group {}", grcode),
            accident_year: ay,
            development_year: ay + lag as i32 - 1,
            development_lag: lag,
            cum_paid_loss: loss,
            earned_prem_dir: 1200.0,
            earned_prem_net: 1000.0,
        }
    }

    #[test]
    fn test_company_filter_and_listing() {
        let records = vec![
            record(86, 1988, 1, 10.0),
            record(337, 1988, 1, 20.0),
            record(86, 1988, 2, 15.0),
        ];

        let allstate = company_records(&records, 86);
        assert_eq!(allstate.len(), 2);
        assert!(allstate.iter().all(|r| r.grcode == 86));

        let companies = list_companies(&records);
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].label(), "86-Group 86");
        assert_eq!(companies[1].grcode, 337);
    }

    #[test]
    fn test_earned_premium_basis() {
        let records = vec![record(86, 1988, 1, 10.0), record(86, 1989, 1, 12.0)];

        let net = earned_premium(&records, &[1988, 1989], PremiumBasis::Net).unwrap();
        assert_eq!(net, vec![(1988, 1000.0), (1989, 1000.0)]);

        let direct = earned_premium(&records, &[1988], PremiumBasis::Direct).unwrap();
        assert_eq!(direct, vec![(1988, 1200.0)]);

        let missing = earned_premium(&records, &[1990], PremiumBasis::Net);
        assert!(matches!(
            missing,
            Err(RatemakingError::MissingPeriodValue { period: 1990, .. })
        ));
    }

    #[test]
    fn test_premium_basis_parse() {
        assert_eq!("net".parse::<PremiumBasis>().unwrap(), PremiumBasis::Net);
        assert_eq!("Direct".parse::<PremiumBasis>().unwrap(), PremiumBasis::Direct);
        assert!("gross".parse::<PremiumBasis>().is_err());
    }
}
