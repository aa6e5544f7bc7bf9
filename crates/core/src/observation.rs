use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};
use crate::value_object::ValueObject;

/// One historical data point: a calendar date and the demand observed on it.
///
/// `actual_demand` is `None` when the source row had no value (a gap).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandObservation {
    pub date: NaiveDate,
    #[serde(default)]
    pub actual_demand: Option<f64>,
}

impl ValueObject for DemandObservation {}

impl DemandObservation {
    /// Build a validated observation (demand, when present, must be finite and >= 0).
    pub fn new(date: NaiveDate, actual_demand: Option<f64>) -> ForecastResult<Self> {
        let obs = Self {
            date,
            actual_demand,
        };
        obs.validate()?;
        Ok(obs)
    }

    /// Convenience for the common "demand was recorded" case.
    pub fn recorded(date: NaiveDate, demand: f64) -> ForecastResult<Self> {
        Self::new(date, Some(demand))
    }

    pub fn missing(date: NaiveDate) -> Self {
        Self {
            date,
            actual_demand: None,
        }
    }

    pub fn validate(&self) -> ForecastResult<()> {
        match self.actual_demand {
            Some(d) if !d.is_finite() => Err(ForecastError::invalid_observation(format!(
                "demand on {} is not a finite number",
                self.date
            ))),
            Some(d) if d < 0.0 => Err(ForecastError::invalid_observation(format!(
                "demand on {} is negative ({d})",
                self.date
            ))),
            _ => Ok(()),
        }
    }
}

/// Validate a whole history: every observation individually, then strict date order.
pub fn validate_history(history: &[DemandObservation]) -> ForecastResult<()> {
    for obs in history {
        obs.validate()?;
    }

    for (index, pair) in history.windows(2).enumerate() {
        let (previous, current) = (pair[0].date, pair[1].date);
        if current <= previous {
            return Err(ForecastError::UnsortedInput {
                index: index + 1,
                previous,
                current,
            });
        }
    }

    Ok(())
}
