//! Descriptive statistics for a demand series (data-quality report).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use demandcast_core::{ContextColumn, DemandObservation, SupplyContext};

use crate::trend::{mean, stddev_sample};

/// Missing-value count and `describe`-style statistics for one column.
///
/// Quantiles use linear interpolation between closest ranks; `std` is the
/// sample standard deviation. Statistics are `None` when there is no data
/// (and `std` also when there is a single value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub missing: usize,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    pub fn describe<I>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut missing = 0usize;
        let mut present = Vec::new();
        for v in values {
            match v {
                Some(v) => present.push(v),
                None => missing += 1,
            }
        }
        present.sort_by(f64::total_cmp);

        let count = present.len();
        let m = (count > 0).then(|| mean(&present));

        Self {
            column: column.into(),
            missing,
            count,
            mean: m,
            std: m.filter(|_| count > 1).map(|m| stddev_sample(&present, m)),
            min: present.first().copied(),
            p25: quantile(&present, 0.25),
            median: quantile(&present, 0.5),
            p75: quantile(&present, 0.75),
            max: present.last().copied(),
        }
    }
}

/// Data-quality report for a demand series.
///
/// The top-level statistics describe demand; `columns` repeats them for demand
/// and adds one entry per supply-chain context column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSummary {
    pub rows: usize,
    pub missing_demand: usize,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub columns: Vec<ColumnSummary>,
}

pub fn summarize(observations: &[DemandObservation]) -> DemandSummary {
    summarize_with_context(observations, &[], &[])
}

/// Summarize demand plus the listed context columns of `context`.
pub fn summarize_with_context(
    observations: &[DemandObservation],
    context: &[SupplyContext],
    columns: &[ContextColumn],
) -> DemandSummary {
    let demand = ColumnSummary::describe("demand", observations.iter().map(|o| o.actual_demand));

    let mut all = vec![demand.clone()];
    all.extend(columns.iter().map(|&c| {
        ColumnSummary::describe(c.as_str(), context.iter().map(|r| r.value(c)))
    }));

    DemandSummary {
        rows: observations.len(),
        missing_demand: demand.missing,
        count: demand.count,
        mean: demand.mean,
        std: demand.std,
        min: demand.min,
        p25: demand.p25,
        median: demand.median,
        p75: demand.p75,
        max: demand.max,
        first_date: observations.iter().map(|o| o.date).min(),
        last_date: observations.iter().map(|o| o.date).max(),
        columns: all,
    }
}

/// Linear-interpolated quantile of an ascending slice.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn describes_present_values_and_counts_gaps() {
        let s = summarize(&series(&[Some(4.0), None, Some(1.0), Some(3.0), Some(2.0), None]));

        assert_eq!(s.rows, 6);
        assert_eq!(s.missing_demand, 2);
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, Some(2.5));
        assert_eq!(s.min, Some(1.0));
        assert_eq!(s.max, Some(4.0));
        assert_eq!(s.p25, Some(1.75));
        assert_eq!(s.median, Some(2.5));
        assert_eq!(s.p75, Some(3.25));
        let std = s.std.unwrap();
        assert!((std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(s.first_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(s.last_date, NaiveDate::from_ymd_opt(2025, 1, 6));
    }

    #[test]
    fn empty_series_has_no_statistics() {
        let s = summarize(&[]);
        assert_eq!(s.count, 0);
        assert_eq!(s.mean, None);
        assert_eq!(s.median, None);
        assert_eq!(s.first_date, None);
    }

    #[test]
    fn single_value_has_no_std() {
        let s = summarize(&series(&[Some(7.0)]));
        assert_eq!(s.mean, Some(7.0));
        assert_eq!(s.std, None);
        assert_eq!(s.p75, Some(7.0));
    }

    #[test]
    fn context_columns_get_their_own_describe() {
        let history = series(&[Some(10.0), None, Some(30.0)]);
        let context: Vec<SupplyContext> = history
            .iter()
            .zip([Some(100.0), Some(300.0), None])
            .zip([Some(true), Some(false), Some(true)])
            .map(|((o, inv), flag)| SupplyContext {
                inventory_level: inv,
                risk_flag: flag,
                ..SupplyContext::empty(o.date)
            })
            .collect();

        let s = summarize_with_context(
            &history,
            &context,
            &[ContextColumn::InventoryLevel, ContextColumn::RiskFlag],
        );

        let names: Vec<&str> = s.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["demand", "inventory_level", "risk_flag"]);
        assert_eq!(s.columns[0].missing, s.missing_demand);
        assert_eq!(s.columns[0].mean, Some(20.0));

        let inventory = &s.columns[1];
        assert_eq!(inventory.missing, 1);
        assert_eq!(inventory.count, 2);
        assert_eq!(inventory.median, Some(200.0));

        let flags = &s.columns[2];
        assert_eq!(flags.missing, 0);
        assert_eq!(flags.max, Some(1.0));
        assert!((flags.mean.unwrap() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn demand_only_summary_lists_demand_column() {
        let s = summarize(&series(&[Some(1.0), Some(2.0)]));
        assert_eq!(s.columns.len(), 1);
        assert_eq!(s.columns[0].column, "demand");
        assert_eq!(s.columns[0].count, 2);
    }
}
