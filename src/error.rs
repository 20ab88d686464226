//! Error type shared by the ratemaking engine

use thiserror::Error;

/// Errors raised while building triangles, factors and indications
#[derive(Debug, Error)]
pub enum RatemakingError {
    /// A required (accident year, development year) cell is absent
    #[error("missing observation for accident year {accident_year}, development year {development_year}")]
    MissingObservation {
        accident_year: i32,
        development_year: i32,
    },

    /// More than one record claims the same triangle cell
    #[error("duplicate observation for accident year {accident_year}, development year {development_year}")]
    DuplicateObservation {
        accident_year: i32,
        development_year: i32,
    },

    #[error("division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("empty input sequence for {context}")]
    EmptyInputSequence { context: &'static str },

    /// Earned portions of a period do not add up to one
    #[error("portions for period {period} sum to {total:.5}, expected 1.0")]
    UnallocatedPeriod { period: i32, total: f64 },

    #[error("length mismatch: {left} vs {right} ({context})")]
    LengthMismatch {
        left: usize,
        right: usize,
        context: &'static str,
    },

    #[error("no {what} available for {period}")]
    MissingPeriodValue { period: i32, what: &'static str },

    #[error("unknown averaging method: {0}")]
    UnknownMethod(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("date parse error: {0}")]
    DateParse(#[from] chrono::ParseError),
}

pub type Result<T> = std::result::Result<T, RatemakingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RatemakingError::MissingObservation {
            accident_year: 1990,
            development_year: 1993,
        };
        assert_eq!(
            err.to_string(),
            "missing observation for accident year 1990, development year 1993"
        );

        let err = RatemakingError::UnallocatedPeriod { period: 1991, total: 0.9 };
        assert!(err.to_string().contains("1991"));
    }
}
