use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use demandcast_forecast::BandPolicy;

#[derive(Debug, Parser)]
#[command(
    name = "demandcast",
    about = "Trend forecasts with confidence bands, anomaly flags and risk tiers",
    version
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Print JSON instead of CSV/tables"
    )]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fit a trend over a demand CSV and project it forward.
    Forecast(ForecastArgs),
    /// Attach observed demand to an exported forecast and flag anomalies.
    Merge(MergeArgs),
    /// Missing values, descriptive statistics and a preview of a demand CSV.
    Summary(SummaryArgs),
    /// Risk-flagged rows, or inventory against demand, from a supply-chain CSV.
    Overlay(OverlayArgs),
    /// Write a synthetic supply-chain dataset.
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
pub struct ForecastArgs {
    #[arg(long, short, help = "Demand CSV with `date` and `demand`/`actual_demand` columns")]
    pub input: PathBuf,
    #[arg(long, short, help = "Forecast CSV destination (stdout if omitted)")]
    pub output: Option<PathBuf>,
    #[arg(long, help = "Also write the combined history + forecast timeline CSV here")]
    pub combined: Option<PathBuf>,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Periods to project (defaults to DEMANDCAST_HORIZON or 30)"
    )]
    pub horizon: Option<i64>,
    #[arg(long, help = "Band policy: residual | fixed | fixed:<width>")]
    pub band: Option<BandPolicy>,
    #[arg(long, help = "Forecasts above this are at least Moderate risk")]
    pub risk_moderate: Option<f64>,
    #[arg(long, help = "Forecasts above this are High risk")]
    pub risk_high: Option<f64>,
    #[arg(long, value_parser = parse_date_arg, help = "Only output rows on or after this date")]
    pub from: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date_arg, help = "Only output rows on or before this date")]
    pub to: Option<NaiveDate>,
    #[arg(long, action = ArgAction::SetTrue, help = "Fail on the first malformed row")]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    #[arg(long, help = "Forecast CSV previously written by `forecast`")]
    pub forecast: PathBuf,
    #[arg(long, help = "Demand CSV with the observed values")]
    pub actuals: PathBuf,
    #[arg(long, short, help = "Merged forecast CSV destination (stdout if omitted)")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[arg(long, short)]
    pub input: PathBuf,
    #[arg(long, default_value_t = 5, help = "Number of leading rows to preview")]
    pub head: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OverlayView {
    /// Rows with `risk_flag = 1`.
    Risk,
    /// Inventory level next to demand (and forecast with `--horizon`).
    Inventory,
}

#[derive(Debug, Args)]
pub struct OverlayArgs {
    #[arg(value_enum)]
    pub view: OverlayView,
    #[arg(long, short)]
    pub input: PathBuf,
    #[arg(long, short, help = "Overlay CSV destination (stdout if omitted)")]
    pub output: Option<PathBuf>,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Extend the inventory view with this many forecast periods"
    )]
    pub horizon: Option<i64>,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(long, short, help = "Dataset destination (stdout if omitted)")]
    pub output: Option<PathBuf>,
    #[arg(long, default_value_t = 100)]
    pub days: usize,
    #[arg(long, value_parser = parse_date_arg, help = "Date of the last row (defaults to today)")]
    pub end_date: Option<NaiveDate>,
    #[arg(long, help = "RNG seed (random if omitted)")]
    pub seed: Option<u64>,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    demandcast_io::parse_date(s).ok_or_else(|| format!("unrecognized date '{s}'"))
}
