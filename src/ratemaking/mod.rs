//! Ratemaking engine: from claim records to an overall indicated rate change

mod engine;
mod results;

pub use engine::RatemakingEngine;
pub use results::{IndicationResult, IndicationSummary, YearSummary};
