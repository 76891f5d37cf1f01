use thiserror::Error;

use crate::core::Year;

/// Failures of the forecasting pipeline.
///
/// Models missing from the battery capacity reference are not an error:
/// they contribute zero capacity and are reported in the logs.
#[derive(Debug, Error, PartialEq)]
pub enum ForecastError {
    #[error("there are no historical sales rows")]
    EmptyInput,

    #[error("missing column: `{0}`")]
    MissingColumn(String),

    #[error("year {0} occurs more than once")]
    DuplicateYear(Year),

    #[error("model column `{0}` occurs more than once")]
    DuplicateModel(String),

    /// Retirement rate outside `(0, 1]`, or a non-finite growth rate.
    #[error("invalid rate: {0}")]
    InvalidRate(f64),
}
