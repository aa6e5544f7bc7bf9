//! CSV ingest: turns a demand CSV into validated `DemandObservation`s.
//!
//! - Required columns are resolved by name (`date`, then `actual_demand` or `demand`).
//! - Supply-chain context columns (`inventory_level`, `supplier_score`,
//!   `delay_days`, `risk_flag`) are kept when the header has them.
//! - Bad rows are skipped and reported with their line number, unless strict.
//! - Rows are returned in file order; ordering is validated by the engine.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::debug;

use demandcast_core::{ContextColumn, DemandObservation, SupplyContext};

use crate::error::{DataError, DataResult};

const DATE_COLUMN: &str = "date";
const DEMAND_COLUMNS: [&str; 2] = ["actual_demand", "demand"];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];
const MISSING_MARKERS: [&str; 5] = ["", "nan", "na", "null", "none"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Fail on the first bad row instead of skipping it.
    pub strict: bool,
}

impl LoadOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// A row that was skipped during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub observations: Vec<DemandObservation>,
    /// One entry per observation, same order and dates.
    pub context: Vec<SupplyContext>,
    /// Context columns found in the header.
    pub context_columns: Vec<ContextColumn>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

pub fn load_observations<R: Read>(reader: R, opts: &LoadOptions) -> DataResult<LoadedSeries> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_idx = column_index(&headers, &[DATE_COLUMN])
        .ok_or_else(|| DataError::MissingColumn(DATE_COLUMN.to_string()))?;
    let demand_idx = column_index(&headers, &DEMAND_COLUMNS)
        .ok_or_else(|| DataError::MissingColumn(DEMAND_COLUMNS.join(" or ")))?;
    let columns = ColumnMap {
        date: date_idx,
        demand: demand_idx,
        context: ContextColumn::ALL
            .into_iter()
            .filter_map(|c| column_index(&headers, &[c.as_str()]).map(|i| (c, i)))
            .collect(),
    };

    let mut observations = Vec::new();
    let mut context = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for record in rdr.records() {
        let record = record?;
        rows_read += 1;
        // Header is line 1.
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows_read + 1);

        match parse_row(&record, &columns) {
            Ok((obs, ctx)) => {
                observations.push(obs);
                context.push(ctx);
            }
            Err(message) if opts.strict => return Err(DataError::Row { line, message }),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    debug!(
        rows_read,
        rows_used = observations.len(),
        rows_skipped = row_errors.len(),
        "demand CSV loaded"
    );

    Ok(LoadedSeries {
        observations,
        context,
        context_columns: columns.context.iter().map(|(c, _)| *c).collect(),
        row_errors,
        rows_read,
    })
}

pub fn load_observations_from_path(path: &Path, opts: &LoadOptions) -> DataResult<LoadedSeries> {
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    load_observations(file, opts)
}

fn column_index(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h.eq_ignore_ascii_case(name)))
}

struct ColumnMap {
    date: usize,
    demand: usize,
    context: Vec<(ContextColumn, usize)>,
}

fn parse_row(
    record: &StringRecord,
    columns: &ColumnMap,
) -> Result<(DemandObservation, SupplyContext), String> {
    let raw_date = record.get(columns.date).unwrap_or("");
    let date = parse_date(raw_date).ok_or_else(|| format!("unrecognized date '{raw_date}'"))?;

    let raw_demand = record.get(columns.demand).unwrap_or("");
    let demand = parse_number("demand", raw_demand)?;
    let obs = DemandObservation::new(date, demand).map_err(|e| e.to_string())?;

    let mut ctx = SupplyContext::empty(date);
    for &(column, idx) in &columns.context {
        let raw = record.get(idx).unwrap_or("");
        let name = column.as_str();
        match column {
            ContextColumn::InventoryLevel => ctx.inventory_level = parse_number(name, raw)?,
            ContextColumn::SupplierScore => ctx.supplier_score = parse_number(name, raw)?,
            ContextColumn::DelayDays => ctx.delay_days = parse_number(name, raw)?,
            ContextColumn::RiskFlag => ctx.risk_flag = parse_flag(raw)?,
        }
    }
    ctx.validate().map_err(|e| e.to_string())?;

    Ok((obs, ctx))
}

/// Parse a calendar date, dropping any time-of-day component.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
    {
        return Some(d);
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

fn is_missing(s: &str) -> bool {
    MISSING_MARKERS.iter().any(|m| s.eq_ignore_ascii_case(m))
}

fn parse_number(column: &str, s: &str) -> Result<Option<f64>, String> {
    if is_missing(s) {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .map_err(|_| format!("{column} '{s}' is not a number"))
}

fn parse_flag(s: &str) -> Result<Option<bool>, String> {
    if is_missing(s) {
        return Ok(None);
    }
    match s.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Ok(Some(true)),
        "0" | "0.0" | "false" | "no" => Ok(Some(false)),
        _ => Err(format!("risk_flag '{s}' is not 0/1")),
    }
}
