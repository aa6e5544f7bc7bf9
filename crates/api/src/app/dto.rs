use serde::{Deserialize, Serialize};

use demandcast_core::{DemandObservation, ForecastPoint, SupplyContext};
use demandcast_forecast::DateRange;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ForecastBody {
    pub history: Vec<DemandObservation>,
    /// Falls back to the configured default horizon.
    #[serde(default)]
    pub horizon: Option<i64>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Deserialize)]
pub struct CsvForecastQuery {
    pub horizon: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MergeBody {
    pub points: Vec<ForecastPoint>,
    pub actuals: Vec<DemandObservation>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryBody {
    pub history: Vec<DemandObservation>,
    /// Supply-chain columns to describe next to demand.
    #[serde(default)]
    pub context: Vec<SupplyContext>,
}

#[derive(Debug, Deserialize)]
pub struct OverlayBody {
    pub history: Vec<DemandObservation>,
    pub context: Vec<SupplyContext>,
    /// Extend the inventory view with this many forecast periods.
    #[serde(default)]
    pub horizon: Option<i64>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct MergeResponse {
    pub points: Vec<ForecastPoint>,
    pub anomalies: Vec<ForecastPoint>,
}
