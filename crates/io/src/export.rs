//! CSV export (and re-import) of forecast batches and timelines.

use std::io::{Read, Write};

use demandcast_core::{ForecastPoint, ValueObject};
use demandcast_forecast::{FlaggedRow, InventoryRow, TimelineRow};

use crate::error::{DataError, DataResult};

/// Column order of a forecast export.
pub const FORECAST_COLUMNS: [&str; 8] = [
    "date",
    "day_index",
    "forecasted_demand",
    "lower_bound",
    "upper_bound",
    "actual_demand",
    "anomaly",
    "risk_level",
];

pub fn write_forecast_csv<W: Write>(writer: W, points: &[ForecastPoint]) -> DataResult<()> {
    write_rows(writer, points, &FORECAST_COLUMNS)
}

pub fn write_timeline_csv<W: Write>(writer: W, rows: &[TimelineRow]) -> DataResult<()> {
    write_rows(
        writer,
        rows,
        &[
            "date",
            "day_index",
            "actual_demand",
            "forecasted_demand",
            "lower_bound",
            "upper_bound",
            "anomaly",
            "risk_level",
        ],
    )
}

pub fn write_risk_overlay_csv<W: Write>(writer: W, rows: &[FlaggedRow]) -> DataResult<()> {
    write_rows(
        writer,
        rows,
        &["date", "actual_demand", "inventory_level", "supplier_score", "delay_days"],
    )
}

pub fn write_inventory_csv<W: Write>(writer: W, rows: &[InventoryRow]) -> DataResult<()> {
    write_rows(
        writer,
        rows,
        &["date", "inventory_level", "actual_demand", "forecasted_demand", "surplus"],
    )
}

/// Serialize `rows`, writing the header explicitly so an empty table still has one.
fn write_rows<W, T>(writer: W, rows: &[T], header: &[&str]) -> DataResult<()>
where
    W: Write,
    T: ValueObject + serde::Serialize,
{
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(header)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|e| DataError::Csv(e.into()))?;
    Ok(())
}

/// Render a forecast export into a string (HTTP download bodies).
pub fn forecast_csv_string(points: &[ForecastPoint]) -> DataResult<String> {
    let mut buf = Vec::new();
    write_forecast_csv(&mut buf, points)?;
    String::from_utf8(buf).map_err(|e| DataError::Row {
        line: 0,
        message: format!("export is not valid UTF-8: {e}"),
    })
}

/// Read a forecast export back, re-checking each point's invariants.
pub fn read_forecast_csv<R: Read>(reader: R) -> DataResult<Vec<ForecastPoint>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    for (i, row) in rdr.deserialize::<ForecastPoint>().enumerate() {
        let line = i + 2;
        let point = row.map_err(|e| DataError::Row {
            line,
            message: e.to_string(),
        })?;
        point.validate().map_err(|e| DataError::Row {
            line,
            message: e.to_string(),
        })?;
        points.push(point);
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use demandcast_core::{DemandObservation, RiskLevel};
    use demandcast_forecast::{combine_timeline, forecast};

    fn history() -> Vec<DemandObservation> {
        let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
        vec![
            DemandObservation::recorded(d(1), 100.0).unwrap(),
            DemandObservation::recorded(d(2), 110.0).unwrap(),
            DemandObservation::recorded(d(3), 120.0).unwrap(),
        ]
    }

    #[test]
    fn forecast_export_has_expected_shape() {
        let points = forecast(&history(), 2).unwrap();
        let csv = forecast_csv_string(&points).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], FORECAST_COLUMNS.join(","));
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2025-01-04,3,130"));
        assert!(lines[1].ends_with(",,false,Low"));
    }

    #[test]
    fn empty_export_still_has_header() {
        let csv = forecast_csv_string(&[]).unwrap();
        assert_eq!(csv.trim_end(), FORECAST_COLUMNS.join(","));
    }

    #[test]
    fn exported_forecast_reads_back() {
        let points = forecast(&history(), 3).unwrap();
        let flagged = vec![
            points[0].with_actual(500.0).unwrap(),
            points[1].clone(),
            points[2].clone(),
        ];
        let csv = forecast_csv_string(&flagged).unwrap();

        let read = read_forecast_csv(csv.as_bytes()).unwrap();
        assert_eq!(read, flagged);
        assert!(read[0].anomaly);
        assert_eq!(read[2].risk_level, RiskLevel::Low);
    }

    #[test]
    fn tampered_anomaly_flag_is_rejected_on_read() {
        let csv = "\
date,day_index,forecasted_demand,lower_bound,upper_bound,actual_demand,anomaly,risk_level
2025-01-04,3,130.0,120.0,140.0,135.0,true,Low
";
        match read_forecast_csv(csv.as_bytes()).unwrap_err() {
            DataError::Row { line, .. } => assert_eq!(line, 2),
            other => panic!("expected row error, got {other:?}"),
        }
    }

    #[test]
    fn timeline_export_leaves_history_forecast_cells_empty() {
        let h = history();
        let rows = combine_timeline(&h, &forecast(&h, 1).unwrap());
        let mut buf = Vec::new();
        write_timeline_csv(&mut buf, &rows).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "2025-01-01,0,100.0,,,,false,");
        assert!(lines[4].starts_with("2025-01-04,3,,130"));
    }

    #[test]
    fn overlay_and_inventory_exports() {
        use demandcast_core::SupplyContext;
        use demandcast_forecast::{inventory_vs_demand, risk_overlay};

        let h = history();
        let ctx: Vec<SupplyContext> = h
            .iter()
            .map(|o| SupplyContext {
                inventory_level: Some(150.0),
                risk_flag: Some(o.actual_demand == Some(110.0)),
                ..SupplyContext::empty(o.date)
            })
            .collect();

        let mut buf = Vec::new();
        write_risk_overlay_csv(&mut buf, &risk_overlay(&h, &ctx)).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert_eq!(
            csv.lines().collect::<Vec<_>>(),
            vec![
                "date,actual_demand,inventory_level,supplier_score,delay_days",
                "2025-01-02,110.0,150.0,,",
            ]
        );

        let timeline = combine_timeline(&h, &forecast(&h, 1).unwrap());
        let mut buf = Vec::new();
        write_inventory_csv(&mut buf, &inventory_vs_demand(&timeline, &ctx)).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "2025-01-01,150.0,100.0,,50.0");
        assert!(lines[4].starts_with("2025-01-04,,,130"));
        assert!(lines[4].ends_with(","));
    }
}
