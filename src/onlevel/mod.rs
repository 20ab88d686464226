//! On-level adjustment for rate and benefit changes
//!
//! Historical premium is restated at the current rate level and historical
//! losses at the current benefit level. Both use the same machinery: a
//! chronological change schedule, the parallelogram allocation of each
//! period's earnings across regimes, and the ratio of the current cumulative
//! index to the portion-weighted average index.

mod schedule;
mod parallelogram;
mod factors;

pub use schedule::{
    ChangeEvent, ChangeSchedule, months_between, years_between, period_start,
};
pub use parallelogram::{
    EarnedPortions, raw_portion, derive_segment_portions, period_portions, allocate_portions,
    check_allocation,
    POLICY_TERM_YEARS, PERIOD_LENGTH_YEARS, PORTION_TOLERANCE,
};
pub use factors::{
    OnLevelAnalysis, OnLevelRow, average_cumulative_index, on_level_factor, adjusted_value,
};
