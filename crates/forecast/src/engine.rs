use chrono::Days;
use tracing::debug;

use demandcast_core::{
    DemandObservation, ForecastError, ForecastPoint, ForecastResult, validate_history,
};

use crate::config::ForecastConfig;
use crate::trend::TrendFit;

/// Deterministic demand forecaster.
///
/// Model:
/// - Fit an OLS trend of demand against the observation's position.
/// - Project `horizon` daily periods past the last historical date.
/// - Surround each projection with a symmetric band (see `BandPolicy`).
/// - Classify each projection into a risk tier.
///
/// The engine holds only immutable configuration, so one instance can be
/// shared freely across callers.
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: ForecastConfig,
}

impl ForecastEngine {
    pub fn new(config: ForecastConfig) -> ForecastResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Validate `history` and fit the trend without projecting.
    pub fn fit(&self, history: &[DemandObservation]) -> ForecastResult<TrendFit> {
        validate_history(history)?;
        TrendFit::fit(history)
    }

    pub fn forecast(
        &self,
        history: &[DemandObservation],
        horizon: i64,
    ) -> ForecastResult<Vec<ForecastPoint>> {
        self.forecast_with_fit(history, horizon).map(|(_, points)| points)
    }

    /// Same as `forecast`, also returning the fitted trend.
    pub fn forecast_with_fit(
        &self,
        history: &[DemandObservation],
        horizon: i64,
    ) -> ForecastResult<(TrendFit, Vec<ForecastPoint>)> {
        if horizon <= 0 {
            return Err(ForecastError::InvalidHorizon(horizon));
        }

        let fit = self.fit(history)?;
        let half_width = self.config.band.half_width(&fit);

        // fit() succeeded, so history has at least two entries.
        let Some(last) = history.last() else {
            return Err(ForecastError::InsufficientData { found: 0 });
        };
        let first_index = history.len() as u64;

        debug!(
            intercept = fit.intercept,
            slope = fit.slope,
            residual_error = fit.residual_error,
            band = %self.config.band,
            horizon,
            "trend fitted"
        );

        // The last projected date must be representable before anything is built.
        let steps = horizon as u64;
        if last.date.checked_add_days(Days::new(steps)).is_none() {
            return Err(ForecastError::InvalidHorizon(horizon));
        }

        let points = (1..=steps)
            .map(|step| {
                let date = last
                    .date
                    .checked_add_days(Days::new(step))
                    .ok_or(ForecastError::InvalidHorizon(horizon))?;
                let day_index = first_index + step - 1;
                let forecasted_demand = fit.predict(day_index);

                if !forecasted_demand.is_finite() {
                    return Err(ForecastError::degenerate(format!(
                        "projection for day index {day_index} is not finite"
                    )));
                }

                Ok(ForecastPoint {
                    date,
                    day_index,
                    forecasted_demand,
                    lower_bound: forecasted_demand - half_width,
                    upper_bound: forecasted_demand + half_width,
                    actual_demand: None,
                    anomaly: false,
                    risk_level: self.config.thresholds.classify(forecasted_demand),
                })
            })
            .collect::<ForecastResult<Vec<_>>>()?;

        Ok((fit, points))
    }
}

/// Forecast with the default configuration (residual band, 300/450 tiers).
pub fn forecast(history: &[DemandObservation], horizon: i64) -> ForecastResult<Vec<ForecastPoint>> {
    ForecastEngine::default().forecast(history, horizon)
}
