//! Engine configuration and environment overrides.
//!
//! Variables (all optional):
//! - `DEMANDCAST_HORIZON`: default number of periods to project (30)
//! - `DEMANDCAST_BAND`: `residual` | `fixed` | `fixed:<width>`
//! - `DEMANDCAST_RISK_MODERATE` / `DEMANDCAST_RISK_HIGH`: tier thresholds (300 / 450)
//!
//! Invalid values are logged and replaced by the default.

use serde::{Deserialize, Serialize};
use tracing::warn;

use demandcast_core::{ForecastResult, RiskThresholds};

use crate::band::BandPolicy;

pub const ENV_HORIZON: &str = "DEMANDCAST_HORIZON";
pub const ENV_BAND: &str = "DEMANDCAST_BAND";
pub const ENV_RISK_MODERATE: &str = "DEMANDCAST_RISK_MODERATE";
pub const ENV_RISK_HIGH: &str = "DEMANDCAST_RISK_HIGH";

pub const DEFAULT_HORIZON: i64 = 30;

/// Parameters of the forecast engine (band width policy + risk tiers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default)]
    pub band: BandPolicy,
    #[serde(default)]
    pub thresholds: RiskThresholds,
}

impl ForecastConfig {
    pub fn with_band(mut self, band: BandPolicy) -> Self {
        self.band = band;
        self
    }

    pub fn with_thresholds(mut self, thresholds: RiskThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn validate(&self) -> ForecastResult<()> {
        self.band.validate()?;
        self.thresholds.validate()
    }
}

/// Process-level settings: engine config plus the default horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub horizon: i64,
    pub forecast: ForecastConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            forecast: ForecastConfig::default(),
        }
    }
}

impl Settings {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup` (key -> value).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(raw) = lookup(ENV_HORIZON) {
            match raw.trim().parse::<i64>() {
                Ok(h) if h > 0 => settings.horizon = h,
                _ => warn!(var = ENV_HORIZON, value = %raw, "invalid horizon; using default"),
            }
        }

        if let Some(raw) = lookup(ENV_BAND) {
            match raw.parse::<BandPolicy>() {
                Ok(band) => settings.forecast.band = band,
                Err(e) => warn!(
                    var = ENV_BAND,
                    value = %raw,
                    error = %e,
                    "invalid band policy; using default"
                ),
            }
        }

        let moderate = parse_threshold(&lookup, ENV_RISK_MODERATE);
        let high = parse_threshold(&lookup, ENV_RISK_HIGH);
        if moderate.is_some() || high.is_some() {
            let defaults = RiskThresholds::default();
            match RiskThresholds::new(
                moderate.unwrap_or(defaults.moderate_above),
                high.unwrap_or(defaults.high_above),
            ) {
                Ok(t) => settings.forecast.thresholds = t,
                Err(e) => warn!(error = %e, "inconsistent risk thresholds; using defaults"),
            }
        }

        settings
    }
}

fn parse_threshold<F>(lookup: &F, key: &str) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!(var = key, value = %raw, "invalid risk threshold; using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let s = Settings::from_lookup(|_| None);
        assert_eq!(s, Settings::default());
        assert_eq!(s.horizon, 30);
        assert_eq!(s.forecast.band, BandPolicy::ResidualStdDev);
        assert_eq!(s.forecast.thresholds, RiskThresholds::default());
    }

    #[test]
    fn applies_valid_overrides() {
        let s = Settings::from_lookup(lookup_from(&[
            (ENV_HORIZON, "14"),
            (ENV_BAND, "fixed:20"),
            (ENV_RISK_MODERATE, "100"),
            (ENV_RISK_HIGH, "200"),
        ]));
        assert_eq!(s.horizon, 14);
        assert_eq!(s.forecast.band, BandPolicy::Fixed { width: 20.0 });
        assert_eq!(s.forecast.thresholds, RiskThresholds::new(100.0, 200.0).unwrap());
    }

    #[test]
    fn invalid_values_fall_back() {
        let s = Settings::from_lookup(lookup_from(&[
            (ENV_HORIZON, "-3"),
            (ENV_BAND, "wide"),
            (ENV_RISK_MODERATE, "900"),
        ]));
        assert_eq!(s, Settings::default());
    }
}
