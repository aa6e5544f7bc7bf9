//! Risk tiers for forecasted demand.

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};

/// Discrete risk classification of a forecasted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Moderate, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl core::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for RiskLevel {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "moderate" => Ok(RiskLevel::Moderate),
            "high" => Ok(RiskLevel::High),
            other => Err(ForecastError::invalid_config(format!(
                "unknown risk level '{other}' (expected Low, Moderate or High)"
            ))),
        }
    }
}

/// Thresholds separating the risk tiers.
///
/// Both bounds are exclusive: a value equal to `high_above` is `Moderate`,
/// a value equal to `moderate_above` is `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub moderate_above: f64,
    pub high_above: f64,
}

impl RiskThresholds {
    pub const DEFAULT_MODERATE_ABOVE: f64 = 300.0;
    pub const DEFAULT_HIGH_ABOVE: f64 = 450.0;

    pub fn new(moderate_above: f64, high_above: f64) -> ForecastResult<Self> {
        let t = Self {
            moderate_above,
            high_above,
        };
        t.validate()?;
        Ok(t)
    }

    pub fn validate(&self) -> ForecastResult<()> {
        if !(self.moderate_above.is_finite() && self.high_above.is_finite()) {
            return Err(ForecastError::invalid_config(
                "risk thresholds must be finite numbers",
            ));
        }
        if self.moderate_above > self.high_above {
            return Err(ForecastError::invalid_config(format!(
                "moderate threshold ({}) must not exceed high threshold ({})",
                self.moderate_above, self.high_above
            )));
        }
        Ok(())
    }

    pub fn classify(&self, forecasted_demand: f64) -> RiskLevel {
        if forecasted_demand > self.high_above {
            RiskLevel::High
        } else if forecasted_demand > self.moderate_above {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            moderate_above: Self::DEFAULT_MODERATE_ABOVE,
            high_above: Self::DEFAULT_HIGH_ABOVE,
        }
    }
}
