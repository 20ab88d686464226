//! Rate indications for the sample companies, run in parallel
//!
//! Supports JSON output via --json flag
//! Accepts config via environment variables:
//!   RATEMAKING_DATA (dataset path), INFLATION_PATH, INFLATION_COUNTRY,
//!   FLAT_INFLATION (annual percent, replaces the inflation table)

use anyhow::Context;
use ratemaking_system::data::inflation::{DEFAULT_COUNTRY, DEFAULT_INFLATION_PATH};
use ratemaking_system::data::loader::DEFAULT_DATASET_PATH;
use ratemaking_system::data::{flat_rates, load_claims, load_inflation_rates, SAMPLE_COMPANIES};
use ratemaking_system::ratemaking::IndicationSummary;
use ratemaking_system::{RatemakingAssumptions, RatemakingEngine};
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::time::Instant;

#[derive(Serialize)]
struct BatchResponse {
    company_count: usize,
    indications: Vec<IndicationSummary>,
    failures: Vec<BatchFailure>,
    execution_time_ms: u64,
}

#[derive(Serialize)]
struct BatchFailure {
    grcode: u32,
    error: String,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");
    let start = Instant::now();

    let data_path = env_or("RATEMAKING_DATA", DEFAULT_DATASET_PATH);
    let records = load_claims(&data_path)
        .with_context(|| format!("failed to load dataset {}", data_path))?;
    if !json_output {
        println!("Loaded {} records in {:?}", records.len(), start.elapsed());
    }

    let mut assumptions = RatemakingAssumptions::default_pricing();
    assumptions.trend.country = env_or("INFLATION_COUNTRY", DEFAULT_COUNTRY);

    let rates = match env::var("FLAT_INFLATION") {
        Ok(raw) => {
            let rate: f64 = raw
                .parse()
                .with_context(|| format!("FLAT_INFLATION is not a number: {}", raw))?;
            flat_rates(assumptions.experience.accident_years(), rate)
        }
        Err(_) => {
            let path = env_or("INFLATION_PATH", DEFAULT_INFLATION_PATH);
            load_inflation_rates(&path, &assumptions.trend.country)
                .with_context(|| format!("failed to load inflation rates from {}", path))?
        }
    };

    let engine = RatemakingEngine::new(assumptions);
    let outcomes: Vec<(u32, Result<IndicationSummary, String>)> = SAMPLE_COMPANIES
        .par_iter()
        .map(|&(grcode, _)| {
            let outcome = engine
                .run(&records, grcode, &rates)
                .map(|result| result.summary())
                .map_err(|e| e.to_string());
            (grcode, outcome)
        })
        .collect();

    let mut indications = Vec::new();
    let mut failures = Vec::new();
    for (grcode, outcome) in outcomes {
        match outcome {
            Ok(summary) => indications.push(summary),
            Err(error) => failures.push(BatchFailure { grcode, error }),
        }
    }

    if json_output {
        let response = BatchResponse {
            company_count: SAMPLE_COMPANIES.len(),
            indications,
            failures,
            execution_time_ms: start.elapsed().as_millis() as u64,
        };
        println!(
            "{}",
            serde_json::to_string(&response).context("failed to serialize response")?
        );
        return Ok(());
    }

    println!();
    println!(
        "{:>7} {:<36} {:>10} {:>10} {:>10} {:>8} {:>8}",
        "GRCODE", "Company", "Avg LR", "Perm LR", "Change", "Target", "R2"
    );
    println!("{}", "-".repeat(95));
    for s in &indications {
        println!(
            "{:>7} {:<36} {:>9.2}% {:>9.2}% {:>+9.2}% {:>8} {:>8}",
            s.grcode,
            s.name,
            s.average_loss_ratio * 100.0,
            s.permissible_loss_ratio * 100.0,
            s.indicated_change * 100.0,
            if s.meets_profit_target { "met" } else { "missed" },
            s.r_squared
                .map(|r| format!("{:.4}", r))
                .unwrap_or_else(|| "-".to_string())
        );
    }
    for f in &failures {
        println!("{:>7} failed: {}", f.grcode, f.error);
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
