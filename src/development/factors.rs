//! Age-to-age loss development factors and their latest-N averages

use log::debug;
use serde::{Deserialize, Serialize};

use super::averaging::{
    geometric_average, medial_average, simple_average, volume_weighted_average, AveragingMethod,
};
use super::triangle::Triangle;
use crate::error::{RatemakingError, Result};
use crate::rounding::round4;

/// Number of most recent accident years averaged at each age
pub const DEFAULT_LATEST_N: usize = 5;

/// Compute the LDF triangle: `row[k+1] / row[k]` for every row, rounded to four decimals
pub fn compute_ldfs(losses: &Triangle) -> Result<Triangle> {
    let mut rows = Vec::with_capacity(losses.len());

    for row in losses.rows() {
        let factors = row
            .values
            .windows(2)
            .map(|pair| {
                if pair[0] == 0.0 {
                    Err(RatemakingError::DivisionByZero {
                        context: format!("LDF for accident year {}", row.accident_year),
                    })
                } else {
                    Ok(round4(pair[1] / pair[0]))
                }
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push((row.accident_year, factors));
    }

    Triangle::from_rows(rows)
}

/// The four averaged-LDF sequences, indexed by age-to-age position
///
/// Positions with no observations are left out rather than filled, so a
/// sequence may be shorter than the triangle is wide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AveragedLdfs {
    pub simple: Vec<f64>,
    pub volume: Vec<f64>,
    pub medial: Vec<f64>,
    pub geometric: Vec<f64>,
}

impl AveragedLdfs {
    pub fn get(&self, method: AveragingMethod) -> &[f64] {
        match method {
            AveragingMethod::SimpleAvg => &self.simple,
            AveragingMethod::VolumeAvg => &self.volume,
            AveragingMethod::MedialAvg => &self.medial,
            AveragingMethod::GeometricAvg => &self.geometric,
        }
    }
}

/// Values at `position` from the `n` most recent accident years that have one
///
/// Rows too short for the position and zero entries are skipped.
fn latest_at(triangle: &Triangle, position: usize, n: usize) -> Vec<f64> {
    triangle
        .rows()
        .iter()
        .rev()
        .filter_map(|row| row.values.get(position).copied())
        .filter(|&v| v != 0.0)
        .take(n)
        .collect()
}

/// Matched (later, earlier) loss pairs at `position` and `position - 1`
fn latest_pairs(losses: &Triangle, position: usize, n: usize) -> (Vec<f64>, Vec<f64>) {
    losses
        .rows()
        .iter()
        .rev()
        .filter_map(|row| {
            let later = *row.values.get(position)?;
            let earlier = *row.values.get(position.checked_sub(1)?)?;
            (later != 0.0 && earlier != 0.0).then_some((later, earlier))
        })
        .take(n)
        .unzip()
}

/// Average the LDF triangle over the latest `latest_n` accident years at each age
///
/// Simple, medial and geometric averages read factor position `i` of the LDF
/// triangle. The volume-weighted average walks loss positions `1..width` and
/// divides summed `loss[i]` by summed `loss[i - 1]`, so its entry `i - 1`
/// covers the same transition as factor position `i - 1`.
pub fn compute_averaged_ldfs(
    ldfs: &Triangle,
    losses: &Triangle,
    latest_n: usize,
) -> Result<AveragedLdfs> {
    let mut averaged = AveragedLdfs::default();

    for position in 0..ldfs.width() {
        let window = latest_at(ldfs, position, latest_n);
        if window.is_empty() {
            continue;
        }
        averaged.simple.push(simple_average(&window)?);
        averaged.medial.push(medial_average(&window)?);
        averaged.geometric.push(geometric_average(&window)?);
    }

    for position in 1..losses.width() {
        let (later, earlier) = latest_pairs(losses, position, latest_n);
        if later.is_empty() {
            continue;
        }
        averaged.volume.push(volume_weighted_average(&later, &earlier)?);
    }

    debug!(
        "averaged LDFs over latest {}: {} simple, {} volume positions",
        latest_n,
        averaged.simple.len(),
        averaged.volume.len()
    );
    Ok(averaged)
}
