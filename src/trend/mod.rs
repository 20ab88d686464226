//! Inflation trending and the overall rate indication

mod inflation;
mod provisions;

pub use inflation::{
    TrendBasis, TrendRow, trailing_average_rates, inflation_trend_factor, trend_period,
    trend_factors, apply_trend,
};
pub use provisions::{
    Provisions, RateIndication, indicated_rate_change, loss_ratios, average_loss_ratio,
};
