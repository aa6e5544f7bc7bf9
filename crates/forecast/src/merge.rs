//! Attaching observed demand to an existing forecast batch.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use demandcast_core::{DemandObservation, ForecastPoint, ForecastResult};

/// Attach observed demand to forecast points by date.
///
/// Each point whose date has an actual gets a new copy with `actual_demand`
/// set and `anomaly` recomputed; all other fields are preserved. Points with
/// no matching actual are returned as-is. When `actuals` repeats a date, the
/// later row wins. Observations without demand are ignored.
pub fn attach_actuals(
    points: &[ForecastPoint],
    actuals: &[DemandObservation],
) -> ForecastResult<Vec<ForecastPoint>> {
    let by_date: HashMap<NaiveDate, f64> = actuals
        .iter()
        .filter_map(|obs| obs.actual_demand.map(|d| (obs.date, d)))
        .collect();

    let mut matched = 0usize;
    let merged = points
        .iter()
        .map(|p| match by_date.get(&p.date) {
            Some(actual) => {
                matched += 1;
                p.with_actual(*actual)
            }
            None => Ok(p.clone()),
        })
        .collect::<ForecastResult<Vec<_>>>()?;

    debug!(
        points = points.len(),
        matched,
        anomalies = merged.iter().filter(|p| p.anomaly).count(),
        "actuals attached"
    );

    Ok(merged)
}
