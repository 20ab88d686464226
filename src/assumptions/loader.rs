//! CSV-based change schedule loader
//!
//! Schedules are two-column files:
//!
//! ```text
//! date,change
//! 1988-04-01,0.05
//! 1990-07-01,-0.02
//! ```

use chrono::NaiveDate;
use std::path::Path;

use crate::error::Result;
use crate::onlevel::{ChangeEvent, ChangeSchedule};

/// Default path to the JSON assumptions file
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions.json";

#[derive(Debug, serde::Deserialize)]
struct ScheduleRow {
    date: NaiveDate,
    change: f64,
}

/// Load a rate or benefit change schedule from CSV
pub fn load_change_schedule<P: AsRef<Path>>(path: P) -> Result<ChangeSchedule> {
    read_schedule(csv::Reader::from_path(path)?)
}

/// Load a change schedule from any reader
pub fn load_change_schedule_from_reader<R: std::io::Read>(reader: R) -> Result<ChangeSchedule> {
    read_schedule(csv::Reader::from_reader(reader))
}

fn read_schedule<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<ChangeSchedule> {
    let mut events = Vec::new();
    for result in reader.deserialize() {
        let row: ScheduleRow = result?;
        events.push(ChangeEvent::new(row.date, row.change));
    }
    ChangeSchedule::new(events)
}
