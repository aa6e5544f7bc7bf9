//! Forecast error model.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type used across the forecasting layer.
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Forecasting failure.
///
/// Every variant is an input-validation failure (or a numeric degeneracy that
/// would otherwise leak NaN into the output). None of them are retryable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    /// Fewer than two observations carry a demand value.
    #[error("insufficient data: need at least 2 observations with demand, found {found}")]
    InsufficientData { found: usize },

    /// The projection horizon was zero or negative.
    #[error("invalid horizon: must be a positive number of periods, got {0}")]
    InvalidHorizon(i64),

    /// History dates are not strictly ascending.
    #[error(
        "unsorted input: observation {index} dated {current} does not follow {previous} (dates must be unique and ascending)"
    )]
    UnsortedInput {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    /// A single observation failed validation (negative or non-finite demand).
    #[error("invalid observation: {0}")]
    InvalidObservation(String),

    /// Band policy, thresholds or date range were inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The trend fit produced non-finite coefficients or residual error.
    #[error("degenerate fit: {0}")]
    DegenerateFit(String),
}

impl ForecastError {
    pub fn invalid_observation(msg: impl Into<String>) -> Self {
        Self::InvalidObservation(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateFit(msg.into())
    }

    /// Stable machine-readable code (used by HTTP and CLI surfaces).
    pub fn code(&self) -> &'static str {
        match self {
            ForecastError::InsufficientData { .. } => "insufficient_data",
            ForecastError::InvalidHorizon(_) => "invalid_horizon",
            ForecastError::UnsortedInput { .. } => "unsorted_input",
            ForecastError::InvalidObservation(_) => "invalid_observation",
            ForecastError::InvalidConfig(_) => "invalid_config",
            ForecastError::DegenerateFit(_) => "degenerate_fit",
        }
    }
}
