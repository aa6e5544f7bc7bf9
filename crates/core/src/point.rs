use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};
use crate::risk::RiskLevel;
use crate::value_object::ValueObject;

/// One projected period.
///
/// Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub day_index: u64,
    pub forecasted_demand: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub actual_demand: Option<f64>,
    pub anomaly: bool,
    pub risk_level: RiskLevel,
}

impl ValueObject for ForecastPoint {}

impl ForecastPoint {
    /// True if `value` lies strictly outside `[lower_bound, upper_bound]`.
    pub fn is_outside_band(&self, value: f64) -> bool {
        value < self.lower_bound || value > self.upper_bound
    }

    /// Return a copy carrying the observed demand, with `anomaly` recomputed.
    ///
    /// No other field changes.
    pub fn with_actual(&self, actual: f64) -> ForecastResult<Self> {
        if !actual.is_finite() || actual < 0.0 {
            return Err(ForecastError::invalid_observation(format!(
                "actual demand for {} must be a finite non-negative number, got {actual}",
                self.date
            )));
        }
        Ok(Self {
            actual_demand: Some(actual),
            anomaly: self.is_outside_band(actual),
            ..self.clone()
        })
    }

    /// Whether the stored `anomaly` flag agrees with the stored actual and band.
    pub fn anomaly_is_consistent(&self) -> bool {
        let expected = self
            .actual_demand
            .is_some_and(|a| self.is_outside_band(a));
        self.anomaly == expected
    }

    /// Check both record invariants (band ordering and anomaly flag).
    pub fn validate(&self) -> ForecastResult<()> {
        let ordered = self.lower_bound <= self.forecasted_demand
            && self.forecasted_demand <= self.upper_bound;
        if !ordered {
            return Err(ForecastError::invalid_observation(format!(
                "forecast for {} violates lower <= forecast <= upper ({} / {} / {})",
                self.date, self.lower_bound, self.forecasted_demand, self.upper_bound
            )));
        }
        if !self.anomaly_is_consistent() {
            return Err(ForecastError::invalid_observation(format!(
                "forecast for {} has an anomaly flag inconsistent with its actual demand",
                self.date
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> ForecastPoint {
        ForecastPoint {
            date: NaiveDate::from_ymd_opt(2025, 1, 4).unwrap(),
            day_index: 3,
            forecasted_demand: 130.0,
            lower_bound: 120.0,
            upper_bound: 140.0,
            actual_demand: None,
            anomaly: false,
            risk_level: RiskLevel::Low,
        }
    }

    #[test]
    fn out_of_band_actual_flips_only_anomaly() {
        let p = point();
        let merged = p.with_actual(200.0).unwrap();

        assert!(merged.anomaly);
        assert_eq!(merged.actual_demand, Some(200.0));
        assert_eq!(
            ForecastPoint {
                actual_demand: None,
                anomaly: false,
                ..merged.clone()
            },
            p
        );
    }

    #[test]
    fn band_edges_are_not_anomalous() {
        let p = point();
        assert!(!p.with_actual(120.0).unwrap().anomaly);
        assert!(!p.with_actual(140.0).unwrap().anomaly);
        assert!(p.with_actual(119.99).unwrap().anomaly);
    }

    #[test]
    fn negative_actual_is_rejected() {
        assert!(point().with_actual(-5.0).is_err());
    }

    #[test]
    fn inconsistent_anomaly_flag_fails_validation() {
        let p = ForecastPoint {
            anomaly: true,
            ..point()
        };
        assert!(p.validate().is_err());
        assert!(point().validate().is_ok());
    }
}
