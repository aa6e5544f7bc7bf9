//! Ordinary least-squares trend over a sequential day index.

use serde::{Deserialize, Serialize};

use demandcast_core::{DemandObservation, ForecastError, ForecastResult};

/// Fitted linear trend `demand = intercept + slope * day_index`.
///
/// Model:
/// - `day_index` is the 0-based position of the observation in the history.
/// - Observations without demand keep their position but do not enter the fit.
/// - `residual_error` is the **population** standard deviation (divide by n)
///   of `actual - predicted` over the fitted points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendFit {
    pub intercept: f64,
    pub slope: f64,
    pub residual_error: f64,
    pub fitted_points: usize,
}

impl TrendFit {
    /// Fit over every observation with a present demand.
    pub fn fit(history: &[DemandObservation]) -> ForecastResult<Self> {
        let samples: Vec<(f64, f64)> = history
            .iter()
            .enumerate()
            .filter_map(|(i, obs)| obs.actual_demand.map(|y| (i as f64, y)))
            .collect();

        if samples.len() < 2 {
            return Err(ForecastError::InsufficientData {
                found: samples.len(),
            });
        }

        let xs: Vec<f64> = samples.iter().map(|(x, _)| *x).collect();
        let ys: Vec<f64> = samples.iter().map(|(_, y)| *y).collect();
        let x_mean = mean(&xs);
        let y_mean = mean(&ys);

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (x, y) in &samples {
            let dx = x - x_mean;
            sxx += dx * dx;
            sxy += dx * (y - y_mean);
        }

        // Positions are distinct, so with >= 2 samples sxx > 0.
        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let residuals: Vec<f64> = samples
            .iter()
            .map(|(x, y)| y - (intercept + slope * x))
            .collect();
        let residual_error = stddev_population(&residuals, mean(&residuals));

        let fit = Self {
            intercept,
            slope,
            residual_error,
            fitted_points: samples.len(),
        };

        if !(fit.intercept.is_finite() && fit.slope.is_finite() && fit.residual_error.is_finite()) {
            return Err(ForecastError::degenerate(format!(
                "trend fit over {} points is not finite (intercept={}, slope={}, error={})",
                fit.fitted_points, fit.intercept, fit.slope, fit.residual_error
            )));
        }

        Ok(fit)
    }

    pub fn predict(&self, day_index: u64) -> f64 {
        self.intercept + self.slope * (day_index as f64)
    }
}

pub(crate) fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

/// Population standard deviation (n), deterministic.
pub(crate) fn stddev_population(xs: &[f64], mean: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let var = xs
        .iter()
        .map(|x| {
            let d = x - mean;
            d * d
        })
        .sum::<f64>()
        / (xs.len() as f64);
    var.sqrt()
}

/// Sample standard deviation (n-1), deterministic.
pub(crate) fn stddev_sample(xs: &[f64], mean: f64) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let var = xs
        .iter()
        .map(|x| {
            let d = x - mean;
            d * d
        })
        .sum::<f64>()
        / ((xs.len() - 1) as f64);
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(values: &[Option<f64>]) -> Vec<DemandObservation> {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| DemandObservation {
                date: start + chrono::Days::new(i as u64),
                actual_demand: *v,
            })
            .collect()
    }

    #[test]
    fn perfect_line_has_zero_error() {
        let fit = TrendFit::fit(&series(&[Some(100.0), Some(110.0), Some(120.0)])).unwrap();
        assert!((fit.intercept - 100.0).abs() < 1e-9);
        assert!((fit.slope - 10.0).abs() < 1e-9);
        assert!(fit.residual_error.abs() < 1e-9);
        assert_eq!(fit.fitted_points, 3);
    }

    #[test]
    fn gaps_keep_their_day_index() {
        // y = 2x with index 1 missing: the fit must still see x = 0, 2, 3.
        let fit = TrendFit::fit(&series(&[Some(0.0), None, Some(4.0), Some(6.0)])).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!(fit.intercept.abs() < 1e-9);
        assert_eq!(fit.fitted_points, 3);
    }

    #[test]
    fn residual_error_uses_population_stddev() {
        // Residuals around the OLS line for (0,0),(1,2),(2,0),(3,2):
        // slope 0.4, intercept 0.4 -> residuals -0.4, 1.2, -1.2, 0.4.
        let fit = TrendFit::fit(&series(&[Some(0.0), Some(2.0), Some(0.0), Some(2.0)])).unwrap();
        let expected = ((0.16 + 1.44 + 1.44 + 0.16) / 4.0f64).sqrt();
        assert!((fit.residual_error - expected).abs() < 1e-9);
    }

    #[test]
    fn constant_demand_is_a_flat_trend() {
        let fit = TrendFit::fit(&series(&[Some(50.0); 5])).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.residual_error, 0.0);
        assert_eq!(fit.predict(10), 50.0);
    }

    #[test]
    fn single_valued_point_is_insufficient() {
        let err = TrendFit::fit(&series(&[None, Some(3.0), None])).unwrap_err();
        assert_eq!(err, ForecastError::InsufficientData { found: 1 });
    }

    #[test]
    fn overflowing_values_are_degenerate() {
        let err = TrendFit::fit(&series(&[Some(0.0), Some(f64::MAX), Some(0.0)])).unwrap_err();
        assert!(matches!(err, ForecastError::DegenerateFit(_)));
    }

    #[test]
    fn sample_and_population_stddev_differ_by_bessel() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&xs);
        assert!((stddev_population(&xs, m) - 2.0).abs() < 1e-12);
        assert!((stddev_sample(&xs, m) - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }
}
