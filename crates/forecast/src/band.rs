//! Confidence band policy.

use serde::{Deserialize, Serialize};

use demandcast_core::{ForecastError, ForecastResult};

use crate::trend::TrendFit;

/// How wide the symmetric band around each forecast is.
///
/// - `ResidualStdDev`: half-width is the fit's residual standard deviation.
/// - `Fixed`: half-width is a constant, independent of the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BandPolicy {
    #[default]
    ResidualStdDev,
    Fixed { width: f64 },
}

impl BandPolicy {
    /// Half-width used when `fixed` is given without a value.
    pub const DEFAULT_FIXED_WIDTH: f64 = 20.0;

    pub fn validate(&self) -> ForecastResult<()> {
        match self {
            BandPolicy::ResidualStdDev => Ok(()),
            BandPolicy::Fixed { width } if width.is_finite() && *width >= 0.0 => Ok(()),
            BandPolicy::Fixed { width } => Err(ForecastError::invalid_config(format!(
                "fixed band width must be a finite non-negative number, got {width}"
            ))),
        }
    }

    pub fn half_width(&self, fit: &TrendFit) -> f64 {
        match self {
            BandPolicy::ResidualStdDev => fit.residual_error,
            BandPolicy::Fixed { width } => *width,
        }
    }
}

impl core::fmt::Display for BandPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BandPolicy::ResidualStdDev => f.write_str("residual"),
            BandPolicy::Fixed { width } => write!(f, "fixed:{width}"),
        }
    }
}

/// Parses `residual`, `fixed` or `fixed:<width>`.
impl core::str::FromStr for BandPolicy {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let policy = match s.split_once(':') {
            None if s == "residual" || s == "residual_std_dev" => BandPolicy::ResidualStdDev,
            None if s == "fixed" => BandPolicy::Fixed {
                width: Self::DEFAULT_FIXED_WIDTH,
            },
            Some(("fixed", width)) => {
                let width: f64 = width.trim().parse().map_err(|_| {
                    ForecastError::invalid_config(format!("invalid fixed band width '{width}'"))
                })?;
                BandPolicy::Fixed { width }
            }
            _ => {
                return Err(ForecastError::invalid_config(format!(
                    "unknown band policy '{s}' (expected residual, fixed or fixed:<width>)"
                )));
            }
        };
        policy.validate()?;
        Ok(policy)
    }
}
