//! Request/response wrapper around the engine.
//!
//! Each call takes the full dataset and view parameters and returns a fresh,
//! self-contained batch. Nothing is retained between calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use demandcast_core::{BatchId, DemandObservation, ForecastPoint, ForecastResult};

use crate::engine::ForecastEngine;
use crate::trend::TrendFit;
use crate::view::{self, DateRange, RiskCounts, TimelineRow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub history: Vec<DemandObservation>,
    pub horizon: i64,
    /// Restricts the returned points/timeline; the fit always uses all history.
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub batch_id: BatchId,
    pub generated_at: DateTime<Utc>,
    pub trend: TrendFit,
    pub points: Vec<ForecastPoint>,
    pub timeline: Vec<TimelineRow>,
    pub anomalies: Vec<ForecastPoint>,
    pub risk_counts: RiskCounts,
}

impl ForecastEngine {
    /// Run one forecast request end to end.
    pub fn run(&self, request: &ForecastRequest) -> ForecastResult<ForecastResponse> {
        if let Some(range) = &request.date_range {
            range.validate()?;
        }

        let (trend, points) = self.forecast_with_fit(&request.history, request.horizon)?;
        let timeline = view::combine_timeline(&request.history, &points);

        let (points, timeline) = match &request.date_range {
            Some(range) => (
                view::filter_points(&points, range),
                view::filter_timeline(&timeline, range),
            ),
            None => (points, timeline),
        };

        let batch_id = BatchId::new();
        let risk_counts = RiskCounts::tally(&points);
        info!(
            batch_id = %batch_id,
            history = request.history.len(),
            horizon = request.horizon,
            returned = points.len(),
            high = risk_counts.high,
            "forecast batch generated"
        );

        Ok(ForecastResponse {
            batch_id,
            generated_at: Utc::now(),
            trend,
            anomalies: view::anomaly_table(&points),
            risk_counts,
            points,
            timeline,
        })
    }
}
