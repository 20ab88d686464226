//! Worked parallelogram example
//!
//! Rate changes of +5% (2015-04-01), +10% (2016-01-01) and -2% (2017-07-01)
//! on annual policies, applied to calendar years 2015-2018 of earned premium.

use anyhow::Context;
use chrono::NaiveDate;
use ratemaking_system::onlevel::{ChangeEvent, ChangeSchedule, OnLevelAnalysis};

const EARNED_PREMIUM: [(i32, f64); 4] = [
    (2015, 20_400.0),
    (2016, 21_000.0),
    (2017, 22_800.0),
    (2018, 23_200.0),
];

fn event(y: i32, m: u32, d: u32, change: f64) -> anyhow::Result<ChangeEvent> {
    let date = NaiveDate::from_ymd_opt(y, m, d)
        .with_context(|| format!("invalid date {}-{}-{}", y, m, d))?;
    Ok(ChangeEvent::new(date, change))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let schedule = ChangeSchedule::new(vec![
        event(2015, 4, 1, 0.05)?,
        event(2016, 1, 1, 0.10)?,
        event(2017, 7, 1, -0.02)?,
    ])?;
    let periods: Vec<i32> = EARNED_PREMIUM.iter().map(|(year, _)| *year).collect();

    let analysis = OnLevelAnalysis::compute(&schedule, &periods)?;
    let adjusted = analysis.adjust(&EARNED_PREMIUM)?;

    println!("Rate level indices:       {:?}", schedule.level_indices());
    println!("Cumulative rate indices:  {:?}", analysis.cumulative_indices);
    println!("Current cumulative index: {:.4}\n", analysis.current_index);

    println!(
        "{:>6} {:>40} {:>10} {:>10} {:>12} {:>12}",
        "Year", "Portions", "Avg Index", "Factor", "Earned", "On-Level"
    );
    println!("{}", "-".repeat(95));
    for (row, ((_, earned), (_, on_level))) in analysis
        .rows
        .iter()
        .zip(EARNED_PREMIUM.iter().zip(&adjusted))
    {
        let portions: Vec<String> = row.portions.iter().map(|p| format!("{:.5}", p)).collect();
        println!(
            "{:>6} {:>40} {:>10.5} {:>10.5} {:>12.2} {:>12.2}",
            row.period,
            portions.join(" "),
            row.average_index,
            row.factor,
            earned,
            on_level
        );
    }

    let total: f64 = adjusted.iter().map(|(_, v)| v).sum();
    println!("\nTotal on-level earned premium: {:.2}", total);
    Ok(())
}
