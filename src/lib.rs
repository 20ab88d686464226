//! Ratemaking System - workers' compensation rate indications from Schedule P data
//!
//! This library provides:
//! - Loss triangles, age-to-age factors and chain-ladder ultimates
//! - Parallelogram on-level factors for rate and benefit changes
//! - Inflation trending of losses and premium
//! - Loss ratios, expense and profit provisions, and the indicated rate change

pub mod error;
pub mod rounding;
pub mod data;
pub mod development;
pub mod onlevel;
pub mod trend;
pub mod assumptions;
pub mod ratemaking;

// Re-export commonly used types
pub use error::{RatemakingError, Result};
pub use data::{ClaimRecord, Company, InflationRates, PremiumBasis};
pub use development::{AveragingMethod, Triangle};
pub use onlevel::{ChangeEvent, ChangeSchedule, OnLevelAnalysis};
pub use assumptions::RatemakingAssumptions;
pub use ratemaking::{IndicationResult, RatemakingEngine};
