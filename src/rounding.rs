//! Decimal rounding used for factor and portion tables

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Factors, averages and CDFs are shown to four decimals
pub fn round4(value: f64) -> f64 {
    round_to(value, 4)
}

/// Portions, index averages and on-level factors carry five decimals
pub fn round5(value: f64) -> f64 {
    round_to(value, 5)
}
