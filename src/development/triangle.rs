//! Accident-year by development-age triangles

use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::data::ClaimRecord;
use crate::error::{RatemakingError, Result};

/// Observations for one accident year, youngest age first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleRow {
    pub accident_year: i32,
    pub values: Vec<f64>,
}

impl TriangleRow {
    /// Most mature observation in the row
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Ragged triangle with rows ordered by accident year, oldest first
///
/// The same shape holds cumulative losses and age-to-age factors; a factor
/// triangle has one element fewer per row than the loss triangle it came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    rows: Vec<TriangleRow>,
}

impl Triangle {
    /// Build from (accident year, values) pairs; years must be strictly increasing
    pub fn from_rows(rows: Vec<(i32, Vec<f64>)>) -> Result<Self> {
        for pair in rows.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(RatemakingError::InvalidInput(format!(
                    "triangle rows out of order: {} follows {}",
                    pair[1].0, pair[0].0
                )));
            }
        }
        Ok(Self {
            rows: rows
                .into_iter()
                .map(|(accident_year, values)| TriangleRow { accident_year, values })
                .collect(),
        })
    }

    pub fn rows(&self) -> &[TriangleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn accident_years(&self) -> Vec<i32> {
        self.rows.iter().map(|r| r.accident_year).collect()
    }

    pub fn row(&self, accident_year: i32) -> Option<&[f64]> {
        self.rows
            .iter()
            .find(|r| r.accident_year == accident_year)
            .map(|r| r.values.as_slice())
    }

    /// Longest row length (number of development ages observed)
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.values.len()).max().unwrap_or(0)
    }

    /// Latest diagonal: each accident year's most mature value
    pub fn latest_diagonal(&self) -> Vec<(i32, f64)> {
        self.rows
            .iter()
            .filter_map(|r| r.latest().map(|v| (r.accident_year, v)))
            .collect()
    }
}

/// Arrange cumulative paid losses into a triangle
///
/// For accident year `Y` the row holds development years `Y..=end`, so the
/// triangle is ragged. Exactly one record must exist per cell.
pub fn build_triangle(records: &[ClaimRecord], years: RangeInclusive<i32>) -> Result<Triangle> {
    let end = *years.end();
    let mut rows = Vec::new();

    for accident_year in years {
        let mut values = Vec::with_capacity((end - accident_year + 1).max(0) as usize);
        for development_year in accident_year..=end {
            let mut matches = records
                .iter()
                .filter(|r| r.accident_year == accident_year && r.development_year == development_year);

            let record = matches.next().ok_or(RatemakingError::MissingObservation {
                accident_year,
                development_year,
            })?;
            if matches.next().is_some() {
                return Err(RatemakingError::DuplicateObservation {
                    accident_year,
                    development_year,
                });
            }
            values.push(record.cum_paid_loss);
        }
        rows.push((accident_year, values));
    }

    let triangle = Triangle::from_rows(rows)?;
    debug!(
        "built loss triangle: {} accident years, width {}",
        triangle.len(),
        triangle.width()
    );
    Ok(triangle)
}

/// Development age heading in months: 12, 24, ...
pub fn age_label(position: usize) -> String {
    format!("{}", (position + 1) * 12)
}

/// Age-to-age heading: "12-24", "24-36", ...
pub fn transition_label(position: usize) -> String {
    format!("{}-{}", (position + 1) * 12, (position + 2) * 12)
}

/// Heading for the tail position: "120-ult" for a ten-year triangle
pub fn tail_label(position: usize) -> String {
    format!("{}-ult", (position + 1) * 12)
}
