//! Averages of loss development factors
//!
//! Every reducer rejects an empty input and rounds its result to four decimals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RatemakingError, Result};
use crate::rounding::round4;

/// Averaging method used to select age-to-age factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AveragingMethod {
    #[default]
    SimpleAvg,
    VolumeAvg,
    MedialAvg,
    GeometricAvg,
}

impl AveragingMethod {
    pub const ALL: [AveragingMethod; 4] = [
        AveragingMethod::SimpleAvg,
        AveragingMethod::VolumeAvg,
        AveragingMethod::MedialAvg,
        AveragingMethod::GeometricAvg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AveragingMethod::SimpleAvg => "SimpleAvg",
            AveragingMethod::VolumeAvg => "VolumeAvg",
            AveragingMethod::MedialAvg => "MedialAvg",
            AveragingMethod::GeometricAvg => "GeometricAvg",
        }
    }

    /// Long name for table headings
    pub fn display_name(&self) -> &'static str {
        match self {
            AveragingMethod::SimpleAvg => "Simple Average",
            AveragingMethod::VolumeAvg => "Volume-Weighted",
            AveragingMethod::MedialAvg => "Medial Average",
            AveragingMethod::GeometricAvg => "Geometric Average",
        }
    }
}

impl fmt::Display for AveragingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AveragingMethod {
    type Err = RatemakingError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "simpleavg" | "simple" | "simpleaverage" => Ok(AveragingMethod::SimpleAvg),
            "volumeavg" | "volume" | "volumeweighted" | "volumeweightedaverage" => {
                Ok(AveragingMethod::VolumeAvg)
            }
            "medialavg" | "medial" | "medialaverage" => Ok(AveragingMethod::MedialAvg),
            "geometricavg" | "geometric" | "geometricaverage" => Ok(AveragingMethod::GeometricAvg),
            _ => Err(RatemakingError::UnknownMethod(s.to_string())),
        }
    }
}

fn ensure_non_empty(xs: &[f64], context: &'static str) -> Result<()> {
    if xs.is_empty() {
        Err(RatemakingError::EmptyInputSequence { context })
    } else {
        Ok(())
    }
}

/// Arithmetic mean
pub fn simple_average(xs: &[f64]) -> Result<f64> {
    ensure_non_empty(xs, "simple average")?;
    let sum: f64 = xs.iter().sum();
    Ok(round4(sum / xs.len() as f64))
}

/// Ratio of summed later-age losses to summed earlier-age losses
pub fn volume_weighted_average(numerators: &[f64], denominators: &[f64]) -> Result<f64> {
    ensure_non_empty(numerators, "volume-weighted average")?;
    ensure_non_empty(denominators, "volume-weighted average")?;
    if numerators.len() != denominators.len() {
        return Err(RatemakingError::LengthMismatch {
            left: numerators.len(),
            right: denominators.len(),
            context: "volume-weighted average",
        });
    }

    let later: f64 = numerators.iter().sum();
    let earlier: f64 = denominators.iter().sum();
    if earlier == 0.0 {
        return Err(RatemakingError::DivisionByZero {
            context: "volume-weighted average".to_string(),
        });
    }
    Ok(round4(later / earlier))
}

/// Mean excluding one minimum and one maximum; midpoint of min and max for two or fewer values
pub fn medial_average(xs: &[f64]) -> Result<f64> {
    ensure_non_empty(xs, "medial average")?;
    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if xs.len() > 2 {
        let sum: f64 = xs.iter().sum::<f64>() - (max + min);
        Ok(round4(sum / (xs.len() - 2) as f64))
    } else {
        Ok(round4((max + min) / 2.0))
    }
}

/// nth root of the product
pub fn geometric_average(xs: &[f64]) -> Result<f64> {
    ensure_non_empty(xs, "geometric average")?;
    let product: f64 = xs.iter().product();
    Ok(round4(product.powf(1.0 / xs.len() as f64)))
}
