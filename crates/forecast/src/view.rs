//! Read-only data products built from a forecast batch (tables, filters, timelines).

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use demandcast_core::{
    DemandObservation, ForecastError, ForecastPoint, ForecastResult, RiskLevel, SupplyContext,
    ValueObject,
};

/// One row of the combined history + forecast timeline.
///
/// History rows carry only `actual_demand`; forecast rows carry the projection,
/// its band and risk tier (and an actual once one has been attached).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRow {
    pub date: NaiveDate,
    pub day_index: u64,
    pub actual_demand: Option<f64>,
    pub forecasted_demand: Option<f64>,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    pub anomaly: bool,
    pub risk_level: Option<RiskLevel>,
}

impl ValueObject for TimelineRow {}

impl From<&ForecastPoint> for TimelineRow {
    fn from(p: &ForecastPoint) -> Self {
        Self {
            date: p.date,
            day_index: p.day_index,
            actual_demand: p.actual_demand,
            forecasted_demand: Some(p.forecasted_demand),
            lower_bound: Some(p.lower_bound),
            upper_bound: Some(p.upper_bound),
            anomaly: p.anomaly,
            risk_level: Some(p.risk_level),
        }
    }
}

/// History followed by forecast, one row per date.
pub fn combine_timeline(
    history: &[DemandObservation],
    points: &[ForecastPoint],
) -> Vec<TimelineRow> {
    let mut rows: Vec<TimelineRow> = history
        .iter()
        .enumerate()
        .map(|(i, obs)| TimelineRow {
            date: obs.date,
            day_index: i as u64,
            actual_demand: obs.actual_demand,
            forecasted_demand: None,
            lower_bound: None,
            upper_bound: None,
            anomaly: false,
            risk_level: None,
        })
        .collect();
    rows.extend(points.iter().map(TimelineRow::from));
    rows
}

/// Inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ForecastResult<Self> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> ForecastResult<()> {
        if self.start > self.end {
            return Err(ForecastError::invalid_config(format!(
                "date range start {} is after end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Range spanning a timeline (`None` if empty).
    pub fn spanning(rows: &[TimelineRow]) -> Option<Self> {
        let start = rows.iter().map(|r| r.date).min()?;
        let end = rows.iter().map(|r| r.date).max()?;
        Some(Self { start, end })
    }
}

pub fn filter_points(points: &[ForecastPoint], range: &DateRange) -> Vec<ForecastPoint> {
    points
        .iter()
        .filter(|p| range.contains(p.date))
        .cloned()
        .collect()
}

pub fn filter_timeline(rows: &[TimelineRow], range: &DateRange) -> Vec<TimelineRow> {
    rows.iter()
        .filter(|r| range.contains(r.date))
        .cloned()
        .collect()
}

/// Points whose attached actual fell outside the band.
pub fn anomaly_table(points: &[ForecastPoint]) -> Vec<ForecastPoint> {
    points.iter().filter(|p| p.anomaly).cloned().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRow {
    pub date: NaiveDate,
    pub forecasted_demand: f64,
    pub risk_level: RiskLevel,
}

pub fn risk_table(points: &[ForecastPoint]) -> Vec<RiskRow> {
    points
        .iter()
        .map(|p| RiskRow {
            date: p.date,
            forecasted_demand: p.forecasted_demand,
            risk_level: p.risk_level,
        })
        .collect()
}

/// Number of points per risk tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCounts {
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
}

impl RiskCounts {
    pub fn tally(points: &[ForecastPoint]) -> Self {
        points.iter().fold(Self::default(), |mut acc, p| {
            match p.risk_level {
                RiskLevel::Low => acc.low += 1,
                RiskLevel::Moderate => acc.moderate += 1,
                RiskLevel::High => acc.high += 1,
            }
            acc
        })
    }

    pub fn get(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Moderate => self.moderate,
            RiskLevel::High => self.high,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.moderate + self.high
    }
}

/// A history row whose supply-chain context carries `risk_flag = 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedRow {
    pub date: NaiveDate,
    pub actual_demand: Option<f64>,
    pub inventory_level: Option<f64>,
    pub supplier_score: Option<f64>,
    pub delay_days: Option<f64>,
}

impl ValueObject for FlaggedRow {}

/// Context by date; a repeated date keeps the later row.
fn context_by_date(context: &[SupplyContext]) -> HashMap<NaiveDate, &SupplyContext> {
    context.iter().map(|c| (c.date, c)).collect()
}

/// History rows flagged risky by the supply chain, in history order.
pub fn risk_overlay(history: &[DemandObservation], context: &[SupplyContext]) -> Vec<FlaggedRow> {
    let by_date = context_by_date(context);
    history
        .iter()
        .filter_map(|obs| {
            let ctx = by_date.get(&obs.date).filter(|c| c.is_risk_flagged())?;
            Some(FlaggedRow {
                date: obs.date,
                actual_demand: obs.actual_demand,
                inventory_level: ctx.inventory_level,
                supplier_score: ctx.supplier_score,
                delay_days: ctx.delay_days,
            })
        })
        .collect()
}

/// Inventory on hand next to demand for one timeline date.
///
/// `surplus` is inventory minus the actual demand, or minus the forecast when
/// no actual exists; `None` when either side is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub date: NaiveDate,
    pub inventory_level: Option<f64>,
    pub actual_demand: Option<f64>,
    pub forecasted_demand: Option<f64>,
    pub surplus: Option<f64>,
}

impl ValueObject for InventoryRow {}

pub fn inventory_vs_demand(
    timeline: &[TimelineRow],
    context: &[SupplyContext],
) -> Vec<InventoryRow> {
    let by_date = context_by_date(context);
    timeline
        .iter()
        .map(|row| {
            let inventory_level = by_date.get(&row.date).and_then(|c| c.inventory_level);
            let demand = row.actual_demand.or(row.forecasted_demand);
            InventoryRow {
                date: row.date,
                inventory_level,
                actual_demand: row.actual_demand,
                forecasted_demand: row.forecasted_demand,
                surplus: inventory_level.zip(demand).map(|(inv, d)| inv - d),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::forecast;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn history() -> Vec<DemandObservation> {
        // Steep trend: 250, 350, 450 -> forecasts 550, 650 (High).
        vec![
            DemandObservation::recorded(d(2025, 2, 1), 250.0).unwrap(),
            DemandObservation::missing(d(2025, 2, 2)),
            DemandObservation::recorded(d(2025, 2, 3), 450.0).unwrap(),
        ]
    }

    #[test]
    fn timeline_puts_history_before_forecast() {
        let h = history();
        let points = forecast(&h, 2).unwrap();
        let rows = combine_timeline(&h, &points);

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[1].actual_demand, None);
        assert_eq!(rows[1].forecasted_demand, None);
        assert_eq!(rows[3].day_index, 3);
        assert_eq!(rows[3].risk_level, Some(RiskLevel::High));
        assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(
            DateRange::spanning(&rows),
            Some(DateRange::new(d(2025, 2, 1), d(2025, 2, 5)).unwrap())
        );
    }

    #[test]
    fn date_filter_is_inclusive() {
        let h = history();
        let points = forecast(&h, 4).unwrap();
        let range = DateRange::new(d(2025, 2, 5), d(2025, 2, 6)).unwrap();

        let filtered = filter_points(&points, &range);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].date, d(2025, 2, 5));

        let rows = filter_timeline(&combine_timeline(&h, &points), &range);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert!(DateRange::new(d(2025, 3, 1), d(2025, 2, 1)).is_err());
    }

    #[test]
    fn risk_counts_and_tables() {
        let points = forecast(&history(), 3).unwrap();
        let counts = RiskCounts::tally(&points);
        assert_eq!(counts.get(RiskLevel::High), 3);
        assert_eq!(counts.total(), 3);

        let table = risk_table(&points);
        assert_eq!(table.len(), 3);
        assert_eq!(table[0].forecasted_demand, points[0].forecasted_demand);

        assert!(anomaly_table(&points).is_empty());
        let flagged = points[0].with_actual(0.0).unwrap();
        assert_eq!(anomaly_table(&[flagged.clone(), points[1].clone()]), vec![flagged]);
    }

    fn context(date: NaiveDate, inventory: Option<f64>, flag: bool) -> SupplyContext {
        SupplyContext {
            inventory_level: inventory,
            risk_flag: Some(flag),
            ..SupplyContext::empty(date)
        }
    }

    #[test]
    fn risk_overlay_keeps_flagged_history_rows() {
        let h = history();
        let ctx = vec![
            context(d(2025, 2, 1), Some(900.0), false),
            context(d(2025, 2, 2), None, true),
            context(d(2025, 2, 3), Some(100.0), true),
            // No history on this date.
            context(d(2025, 2, 9), Some(1.0), true),
        ];

        let rows = risk_overlay(&h, &ctx);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, d(2025, 2, 2));
        assert_eq!(rows[0].actual_demand, None);
        assert_eq!(rows[1].actual_demand, Some(450.0));
        assert_eq!(rows[1].inventory_level, Some(100.0));
        assert!(risk_overlay(&h, &[]).is_empty());
    }

    #[test]
    fn inventory_view_covers_history_and_forecast() {
        let h = history();
        let points = forecast(&h, 1).unwrap();
        let timeline = combine_timeline(&h, &points);
        let ctx = vec![
            context(d(2025, 2, 1), Some(300.0), false),
            context(d(2025, 2, 3), Some(400.0), false),
            context(d(2025, 2, 4), Some(600.0), false),
        ];

        let rows = inventory_vs_demand(&timeline, &ctx);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].surplus, Some(50.0));
        // No context and no demand on the gap day.
        assert_eq!(rows[1].inventory_level, None);
        assert_eq!(rows[1].surplus, None);
        assert_eq!(rows[2].surplus, Some(-50.0));
        // Forecast rows compare against the projection.
        assert_eq!(rows[3].forecasted_demand, Some(points[0].forecasted_demand));
        assert!((rows[3].surplus.unwrap() - (600.0 - points[0].forecasted_demand)).abs() < 1e-9);
    }
}
