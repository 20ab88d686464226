//! Dated rate and benefit level changes

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{RatemakingError, Result};
use crate::rounding::round4;

/// A step change in rate or benefit level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub effective_date: NaiveDate,
    /// Relative change, e.g. 0.05 for +5%
    pub change: f64,
}

impl ChangeEvent {
    pub fn new(effective_date: NaiveDate, change: f64) -> Self {
        Self { effective_date, change }
    }
}

/// Chronologically ordered history of level changes
///
/// Rate changes (premium) and benefit changes (losses) share this shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ChangeEvent>", into = "Vec<ChangeEvent>")]
pub struct ChangeSchedule {
    events: Vec<ChangeEvent>,
}

impl ChangeSchedule {
    /// Events must be in chronological order
    pub fn new(events: Vec<ChangeEvent>) -> Result<Self> {
        if let Some(pair) = events
            .windows(2)
            .find(|pair| pair[1].effective_date < pair[0].effective_date)
        {
            return Err(RatemakingError::InvalidInput(format!(
                "change on {} listed after {}",
                pair[1].effective_date, pair[0].effective_date
            )));
        }
        Ok(Self { events })
    }

    pub fn events(&self) -> &[ChangeEvent] {
        &self.events
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.events.iter().map(|e| e.effective_date).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Level index per regime: 1.00 before any change, then `1 + change`
    pub fn level_indices(&self) -> Vec<f64> {
        std::iter::once(1.0)
            .chain(self.events.iter().map(|e| 1.0 + e.change))
            .collect()
    }

    /// Running product of the level indices, rounded to four decimals
    pub fn cumulative_indices(&self) -> Vec<f64> {
        self.level_indices()
            .iter()
            .scan(1.0, |level, &index| {
                *level *= index;
                Some(round4(*level))
            })
            .collect()
    }

    /// Cumulative index of the regime in force today
    pub fn current_index(&self) -> f64 {
        self.cumulative_indices().last().copied().unwrap_or(1.0)
    }
}

impl TryFrom<Vec<ChangeEvent>> for ChangeSchedule {
    type Error = RatemakingError;

    fn try_from(events: Vec<ChangeEvent>) -> Result<Self> {
        Self::new(events)
    }
}

impl From<ChangeSchedule> for Vec<ChangeEvent> {
    fn from(schedule: ChangeSchedule) -> Self {
        schedule.events
    }
}

/// Whole months from `earlier` to `later`, ignoring the day of month
pub fn months_between(later: NaiveDate, earlier: NaiveDate) -> i32 {
    (later.year() * 12 + later.month() as i32) - (earlier.year() * 12 + earlier.month() as i32)
}

/// `months_between` expressed in years
pub fn years_between(later: NaiveDate, earlier: NaiveDate) -> f64 {
    months_between(later, earlier) as f64 / 12.0
}

/// January 1 of `year`
pub fn period_start(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| RatemakingError::InvalidInput(format!("year out of range: {}", year)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_change_indices() {
        let schedule = ChangeSchedule::new(vec![ChangeEvent::new(date(2015, 4, 1), 0.05)]).unwrap();
        assert_eq!(schedule.level_indices(), vec![1.0, 1.05]);
        assert_eq!(schedule.cumulative_indices(), vec![1.0, 1.05]);
        assert_eq!(schedule.current_index(), 1.05);
    }

    #[test]
    fn test_cumulative_indices_compound() {
        let schedule = ChangeSchedule::new(vec![
            ChangeEvent::new(date(1988, 4, 1), 0.05),
            ChangeEvent::new(date(1990, 7, 1), -0.02),
            ChangeEvent::new(date(1991, 5, 1), 0.11),
            ChangeEvent::new(date(1993, 8, 1), -0.05),
            ChangeEvent::new(date(1996, 8, 1), 0.15),
        ])
        .unwrap();

        assert_eq!(
            schedule.cumulative_indices(),
            vec![1.0, 1.05, 1.029, 1.1422, 1.0851, 1.2478]
        );
        assert_eq!(schedule.current_index(), 1.2478);
    }

    #[test]
    fn test_zero_changes_give_unit_indices() {
        let schedule = ChangeSchedule::new(vec![
            ChangeEvent::new(date(2001, 1, 1), 0.0),
            ChangeEvent::new(date(2002, 6, 1), 0.0),
            ChangeEvent::new(date(2004, 3, 1), 0.0),
        ])
        .unwrap();
        assert_eq!(schedule.cumulative_indices(), vec![1.0; 4]);

        assert_eq!(ChangeSchedule::default().cumulative_indices(), vec![1.0]);
        assert_eq!(ChangeSchedule::default().current_index(), 1.0);
    }

    #[test]
    fn test_out_of_order_events_rejected() {
        let result = ChangeSchedule::new(vec![
            ChangeEvent::new(date(2016, 1, 1), 0.1),
            ChangeEvent::new(date(2015, 4, 1), 0.05),
        ]);
        assert!(matches!(result, Err(RatemakingError::InvalidInput(_))));
    }

    #[test]
    fn test_months_between() {
        assert_eq!(months_between(date(2015, 4, 1), date(2015, 1, 1)), 3);
        assert_eq!(months_between(date(1990, 7, 1), date(1991, 1, 1)), -6);
        // Day of month is ignored
        assert_eq!(months_between(date(1999, 1, 31), date(1997, 7, 1)), 18);
        assert_eq!(years_between(date(1999, 1, 1), date(1988, 7, 1)), 10.5);
    }

    #[test]
    fn test_serde_validates_order() {
        let json = r#"[{"effective_date":"2016-01-01","change":0.1},{"effective_date":"2015-04-01","change":0.05}]"#;
        assert!(serde_json::from_str::<ChangeSchedule>(json).is_err());

        let json = r#"[{"effective_date":"2015-04-01","change":0.05}]"#;
        let schedule: ChangeSchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.len(), 1);
    }
}
