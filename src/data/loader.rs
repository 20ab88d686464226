//! Load claim records from the Schedule P CSV (wkcomp_pos.csv)

use super::ClaimRecord;
use crate::error::Result;
use csv::Reader;
use log::debug;
use std::path::Path;

/// Default dataset location
pub const DEFAULT_DATASET_PATH: &str = "wkcomp_pos.csv";

/// Raw CSV row; columns the engine does not use are ignored
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "GRCODE")]
    grcode: u32,
    #[serde(rename = "GRNAME")]
    grname: String,
    #[serde(rename = "AccidentYear")]
    accident_year: i32,
    #[serde(rename = "DevelopmentYear")]
    development_year: i32,
    #[serde(rename = "DevelopmentLag")]
    development_lag: u32,
    #[serde(rename = "CumPaidLoss_D")]
    cum_paid_loss: f64,
    #[serde(rename = "EarnedPremDIR_D")]
    earned_prem_dir: f64,
    #[serde(rename = "EarnedPremNet_D")]
    earned_prem_net: f64,
}

impl From<CsvRow> for ClaimRecord {
    fn from(row: CsvRow) -> Self {
        ClaimRecord {
            grcode: row.grcode,
            grname: row.grname.trim().to_string(),
            accident_year: row.accident_year,
            development_year: row.development_year,
            development_lag: row.development_lag,
            cum_paid_loss: row.cum_paid_loss,
            earned_prem_dir: row.earned_prem_dir,
            earned_prem_net: row.earned_prem_net,
        }
    }
}

/// Load all claim records from a CSV file
pub fn load_claims<P: AsRef<Path>>(path: P) -> Result<Vec<ClaimRecord>> {
    let reader = Reader::from_path(path.as_ref())?;
    let records = collect_rows(reader)?;
    debug!("loaded {} claim records from {}", records.len(), path.as_ref().display());
    Ok(records)
}

/// Load claim records from any reader (e.g., string buffer)
pub fn load_claims_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ClaimRecord>> {
    collect_rows(Reader::from_reader(reader))
}

/// Load claim records from the default wkcomp_pos.csv location
pub fn load_default_dataset() -> Result<Vec<ClaimRecord>> {
    load_claims(DEFAULT_DATASET_PATH)
}

fn collect_rows<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<ClaimRecord>> {
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        records.push(row.into());
    }
    Ok(records)
}
