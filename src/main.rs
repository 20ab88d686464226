//! Ratemaking System CLI
//!
//! Runs a rate indication for one company of the Schedule P workers'
//! compensation dataset and prints every intermediate table.

use anyhow::Context;
use clap::{Parser, Subcommand};
use ratemaking_system::assumptions::load_change_schedule;
use ratemaking_system::data::inflation::DEFAULT_INFLATION_PATH;
use ratemaking_system::data::loader::DEFAULT_DATASET_PATH;
use ratemaking_system::data::{flat_rates, list_companies, load_claims, load_inflation_rates};
use ratemaking_system::development::{age_label, tail_label, transition_label};
use ratemaking_system::onlevel::OnLevelAnalysis;
use ratemaking_system::trend::TrendRow;
use ratemaking_system::{
    AveragingMethod, IndicationResult, PremiumBasis, RatemakingAssumptions, RatemakingEngine,
    Triangle,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ratemaking")]
#[command(about = "Workers' compensation rate indications from Schedule P data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the indicated rate change for one company
    Indicate {
        /// Company group code
        #[arg(long, default_value_t = 353)]
        grcode: u32,

        /// Schedule P dataset (CSV)
        #[arg(long, default_value = DEFAULT_DATASET_PATH)]
        data: PathBuf,

        /// Assumptions file (JSON); built-in pricing assumptions when omitted
        #[arg(long)]
        assumptions: Option<PathBuf>,

        /// LDF averaging method (simple, volume, medial, geometric)
        #[arg(long)]
        method: Option<AveragingMethod>,

        /// Tail factor beyond the last observed age
        #[arg(long)]
        tail: Option<f64>,

        /// Earned premium column (net or direct)
        #[arg(long)]
        basis: Option<PremiumBasis>,

        /// Rate change schedule (CSV with date,change)
        #[arg(long)]
        rate_changes: Option<PathBuf>,

        /// Benefit change schedule (CSV with date,change)
        #[arg(long)]
        benefit_changes: Option<PathBuf>,

        /// Inflation table (World Bank CSV layout)
        #[arg(long, default_value = DEFAULT_INFLATION_PATH)]
        inflation: PathBuf,

        /// Country row of the inflation table
        #[arg(long)]
        country: Option<String>,

        /// Use this annual inflation rate (percent) for every year instead of the table
        #[arg(long)]
        flat_inflation: Option<f64>,

        /// Also report the indication under every averaging method
        #[arg(long)]
        compare_methods: bool,

        /// Emit JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// List the companies in the dataset
    Companies {
        /// Schedule P dataset (CSV)
        #[arg(long, default_value = DEFAULT_DATASET_PATH)]
        data: PathBuf,
    },
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    result: &'a IndicationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    method_comparison: Option<Vec<(AveragingMethod, f64)>>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Indicate {
            grcode,
            data,
            assumptions,
            method,
            tail,
            basis,
            rate_changes,
            benefit_changes,
            inflation,
            country,
            flat_inflation,
            compare_methods,
            json,
        } => {
            let mut a = match assumptions {
                Some(path) => RatemakingAssumptions::from_json_path(&path)
                    .with_context(|| format!("failed to load assumptions from {}", path.display()))?,
                None => RatemakingAssumptions::default_pricing(),
            };
            if let Some(method) = method {
                a.selection.method = method;
            }
            if let Some(tail) = tail {
                a.selection.tail = tail;
            }
            if let Some(basis) = basis {
                a.premium_basis = basis;
            }
            if let Some(path) = rate_changes {
                a.rate_changes = load_change_schedule(&path)
                    .with_context(|| format!("failed to load rate changes from {}", path.display()))?;
            }
            if let Some(path) = benefit_changes {
                a.benefit_changes = load_change_schedule(&path).with_context(|| {
                    format!("failed to load benefit changes from {}", path.display())
                })?;
            }
            if let Some(country) = country {
                a.trend.country = country;
            }
            a.validate().context("invalid assumptions")?;

            let records = load_claims(&data)
                .with_context(|| format!("failed to load dataset {}", data.display()))?;
            let rates = match flat_inflation {
                Some(rate) => flat_rates(a.experience.accident_years(), rate),
                None => load_inflation_rates(&inflation, &a.trend.country).with_context(|| {
                    format!("failed to load inflation rates from {}", inflation.display())
                })?,
            };

            let engine = RatemakingEngine::new(a);
            let result = engine
                .run(&records, grcode, &rates)
                .with_context(|| format!("indication failed for company {}", grcode))?;
            let comparison = if compare_methods {
                Some(
                    engine
                        .compare_methods(&records, grcode, &rates)
                        .context("method comparison failed")?,
                )
            } else {
                None
            };

            if json {
                let output = JsonOutput {
                    result: &result,
                    method_comparison: comparison,
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output).context("failed to serialize result")?
                );
            } else {
                print_report(&result);
                if let Some(comparison) = comparison {
                    print_comparison(&comparison);
                }
            }
        }
        Commands::Companies { data } => {
            let records = load_claims(&data)
                .with_context(|| format!("failed to load dataset {}", data.display()))?;
            println!("{:>8}  {}", "GRCODE", "Name");
            println!("{}", "-".repeat(50));
            for company in list_companies(&records) {
                println!("{:>8}  {}", company.grcode, company.name);
            }
        }
    }

    Ok(())
}

fn print_report(result: &IndicationResult) {
    println!("Ratemaking System v0.1.0");
    println!("========================\n");
    println!("Company: {}", result.company.label());
    println!("Method:  {} (tail {:.4})\n", result.method.display_name(), result.selected.tail);

    print_triangle("Cumulative Paid Losses", &result.losses, age_label, 0);
    print_triangle("Age-to-Age Factors", &result.ldfs, transition_label, 4);
    print_averages(result);
    print_selection(result);
    print_ultimates(result);
    print_onlevel("Rate Level (premium)", &result.rate_level);
    print_onlevel("Benefit Level (losses)", &result.benefit_level);
    print_trend("Loss Trend", &result.loss_trend);
    print_trend("Premium Trend", &result.premium_trend);
    print_summary(result);
    print_indication(result);
}

fn print_triangle(title: &str, triangle: &Triangle, label: fn(usize) -> String, decimals: usize) {
    println!("{}:", title);
    print!("{:>6}", "AY");
    for position in 0..triangle.width() {
        print!(" {:>10}", label(position));
    }
    println!();
    println!("{}", "-".repeat(6 + 11 * triangle.width()));
    for row in triangle.rows() {
        print!("{:>6}", row.accident_year);
        for value in &row.values {
            print!(" {:>10.*}", decimals, value);
        }
        println!();
    }
    println!();
}

fn print_averages(result: &IndicationResult) {
    println!("Averaged LDFs (latest diagonals):");
    print!("{:>22}", "");
    for position in 0..result.ldfs.width() {
        print!(" {:>8}", transition_label(position));
    }
    println!();
    for method in AveragingMethod::ALL {
        print!("{:>22}", method.display_name());
        for value in result.averaged_ldfs.get(method) {
            print!(" {:>8.4}", value);
        }
        println!();
    }
    println!();
}

fn print_selection(result: &IndicationResult) {
    let selected = &result.selected.factors;
    let by_age = result.cdfs.by_age();
    let last = selected.len().saturating_sub(1);

    println!("Selected LDFs and CDFs:");
    println!("{:>10} {:>10} {:>10}", "Age", "LDF", "CDF");
    println!("{}", "-".repeat(32));
    for (position, (ldf, cdf)) in selected.iter().zip(&by_age).enumerate() {
        let label = if position == last {
            tail_label(position)
        } else {
            transition_label(position)
        };
        println!("{:>10} {:>10.4} {:>10.4}", label, ldf, cdf);
    }
    println!();
}

fn print_ultimates(result: &IndicationResult) {
    println!("Projected Ultimate Losses:");
    println!("{:>6} {:>14} {:>14} {:>14}", "AY", "Latest", "Projected", "Actual");
    println!("{}", "-".repeat(51));
    let latest = result.losses.latest_diagonal();
    for (i, &(year, projected)) in result.projected_ultimates.iter().enumerate() {
        let paid = latest.get(i).map(|(_, v)| *v).unwrap_or(f64::NAN);
        let actual = result
            .actual_ultimates
            .as_ref()
            .and_then(|a| a.get(i))
            .map(|(_, v)| format!("{:>14.0}", v))
            .unwrap_or_else(|| format!("{:>14}", "-"));
        println!("{:>6} {:>14.0} {:>14.0} {}", year, paid, projected, actual);
    }
    if let Some(backtest) = result.backtest {
        println!(
            "Back-test: MAE {:.2}, R-squared {:.4}",
            backtest.mean_absolute_error, backtest.r_squared
        );
    }
    println!();
}

fn print_onlevel(title: &str, analysis: &OnLevelAnalysis) {
    println!(
        "{} - cumulative indices {:?}, current {:.4}:",
        title, analysis.cumulative_indices, analysis.current_index
    );
    println!("{:>6} {:>12} {:>10}  {}", "Year", "Avg Index", "Factor", "Portions");
    println!("{}", "-".repeat(60));
    for row in &analysis.rows {
        let portions: Vec<String> = row.portions.iter().map(|p| format!("{:.5}", p)).collect();
        println!(
            "{:>6} {:>12.5} {:>10.5}  [{}]",
            row.period,
            row.average_index,
            row.factor,
            portions.join(", ")
        );
    }
    println!();
}

fn print_trend(title: &str, rows: &[TrendRow]) {
    println!("{}:", title);
    println!("{:>6} {:>10} {:>8} {:>10}", "Year", "Avg Rate%", "Years", "Factor");
    println!("{}", "-".repeat(37));
    for row in rows {
        println!(
            "{:>6} {:>10.4} {:>8.2} {:>10.5}",
            row.year, row.average_rate, row.period, row.factor
        );
    }
    println!();
}

fn print_summary(result: &IndicationResult) {
    println!("Trended Losses and Premium:");
    println!(
        "{:>6} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>8}",
        "AY", "Earned Prem", "Adj Prem", "Trended Prem", "Ult Loss", "Adj Loss", "Trended Loss", "LR"
    );
    println!("{}", "-".repeat(110));
    for row in result.summary_rows() {
        println!(
            "{:>6} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>8.4}",
            row.accident_year,
            row.earned_premium,
            row.adjusted_premium,
            row.trended_premium,
            row.projected_ultimate,
            row.adjusted_loss,
            row.trended_loss,
            row.loss_ratio
        );
    }
    println!();
}

fn print_indication(result: &IndicationResult) {
    let indication = &result.indication;
    println!("Indication:");
    println!("  Average loss & LAE ratio: {:>8.3}%", indication.average_loss_ratio * 100.0);
    println!("  Permissible loss ratio:   {:>8.3}%", indication.permissible_loss_ratio * 100.0);
    if indication.meets_profit_target {
        println!("  Underwriting profit target met");
    } else {
        println!("  Underwriting profit target not met");
    }
    println!("  Indicated rate change:    {:>+8.2}%", indication.indicated_change * 100.0);
}

fn print_comparison(comparison: &[(AveragingMethod, f64)]) {
    println!("\nIndicated change by averaging method:");
    for (method, change) in comparison {
        println!("  {:>22} {:>+8.2}%", method.display_name(), change * 100.0);
    }
}
