use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use demandcast_core::RiskThresholds;
use demandcast_forecast::{
    ColumnSummary, DateRange, ForecastEngine, ForecastRequest, RiskCounts, Settings, anomaly_table,
    attach_actuals, combine_timeline, inventory_vs_demand, risk_overlay, summarize_with_context,
};
use demandcast_io::{
    GeneratorConfig, LoadOptions, LoadedSeries, generate_dataset, load_observations_from_path,
    read_forecast_csv, write_dataset_csv, write_forecast_csv, write_inventory_csv,
    write_risk_overlay_csv, write_timeline_csv,
};

use crate::cli::{
    Cli, Commands, ForecastArgs, GenerateArgs, MergeArgs, OverlayArgs, OverlayView, SummaryArgs,
};

pub fn run(cli: Cli, settings: Settings) -> Result<()> {
    match cli.command {
        Commands::Forecast(args) => forecast(args, settings, cli.json),
        Commands::Merge(args) => merge(args, cli.json),
        Commands::Summary(args) => summary(args, cli.json),
        Commands::Overlay(args) => overlay(args, settings, cli.json),
        Commands::Generate(args) => generate(args),
    }
}

/// Env settings overridden by command-line flags.
fn effective_settings(args: &ForecastArgs, mut settings: Settings) -> Result<Settings> {
    if let Some(h) = args.horizon {
        settings.horizon = h;
    }
    if let Some(band) = args.band {
        settings.forecast.band = band;
    }
    if args.risk_moderate.is_some() || args.risk_high.is_some() {
        let current = settings.forecast.thresholds;
        settings.forecast.thresholds = RiskThresholds::new(
            args.risk_moderate.unwrap_or(current.moderate_above),
            args.risk_high.unwrap_or(current.high_above),
        )?;
    }
    Ok(settings)
}

fn date_range(args: &ForecastArgs) -> Result<Option<DateRange>> {
    Ok(match (args.from, args.to) {
        (None, None) => None,
        (start, end) => Some(DateRange::new(
            start.unwrap_or(chrono::NaiveDate::MIN),
            end.unwrap_or(chrono::NaiveDate::MAX),
        )?),
    })
}

fn load(path: &Path, strict: bool) -> Result<LoadedSeries> {
    let opts = LoadOptions { strict };
    let loaded = load_observations_from_path(path, &opts)
        .with_context(|| format!("failed to load demand data from {}", path.display()))?;
    for e in &loaded.row_errors {
        warn!(file = %path.display(), line = e.line, "skipped row: {}", e.message);
    }
    Ok(loaded)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("failed to create {}", p.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    })
}

fn forecast(args: ForecastArgs, settings: Settings, json: bool) -> Result<()> {
    let settings = effective_settings(&args, settings)?;
    let engine = ForecastEngine::new(settings.forecast)?;
    let loaded = load(&args.input, args.strict)?;

    let request = ForecastRequest {
        history: loaded.observations,
        horizon: settings.horizon,
        date_range: date_range(&args)?,
    };
    let response = engine.run(&request)?;

    info!(
        batch_id = %response.batch_id,
        slope = response.trend.slope,
        residual_error = response.trend.residual_error,
        low = response.risk_counts.low,
        moderate = response.risk_counts.moderate,
        high = response.risk_counts.high,
        "forecast complete"
    );

    if let Some(path) = &args.combined {
        write_timeline_csv(open_output(Some(path))?, &response.timeline)
            .with_context(|| format!("failed to write timeline to {}", path.display()))?;
    }

    let mut out = open_output(args.output.as_deref())?;
    if json {
        serde_json::to_writer_pretty(&mut out, &response)?;
        writeln!(out)?;
    } else {
        write_forecast_csv(out, &response.points).context("failed to write forecast")?;
    }
    Ok(())
}

fn merge(args: MergeArgs, json: bool) -> Result<()> {
    let file = File::open(&args.forecast)
        .with_context(|| format!("failed to open {}", args.forecast.display()))?;
    let points = read_forecast_csv(file)
        .with_context(|| format!("failed to read forecast from {}", args.forecast.display()))?;
    let actuals = load(&args.actuals, false)?;

    let merged = attach_actuals(&points, &actuals.observations)?;
    let anomalies = anomaly_table(&merged);
    info!(points = merged.len(), anomalies = anomalies.len(), "actuals merged");

    let mut out = open_output(args.output.as_deref())?;
    if json {
        serde_json::to_writer_pretty(
            &mut out,
            &serde_json::json!({
                "points": merged,
                "anomalies": anomalies,
                "risk_counts": RiskCounts::tally(&merged),
            }),
        )?;
        writeln!(out)?;
    } else {
        write_forecast_csv(out, &merged).context("failed to write merged forecast")?;
    }
    Ok(())
}

fn summary(args: SummaryArgs, json: bool) -> Result<()> {
    let loaded = load(&args.input, false)?;
    let summary =
        summarize_with_context(&loaded.observations, &loaded.context, &loaded.context_columns);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let mut out = io::stdout().lock();
    let shown = args.head.min(loaded.observations.len());
    writeln!(out, "Preview ({shown} of {} rows):", loaded.rows_read)?;
    for obs in loaded.observations.iter().take(args.head) {
        writeln!(out, "  {}  {:>10}", obs.date, cell(obs.actual_demand))?;
    }

    writeln!(out, "\nMissing values:")?;
    for column in &summary.columns {
        writeln!(out, "  {:<16}{}", column.column, column.missing)?;
    }
    writeln!(out, "  {:<16}{}", "skipped rows", loaded.row_errors.len())?;

    writeln!(out, "\nSummary statistics:")?;
    write!(out, "  {:<8}", "")?;
    for column in &summary.columns {
        write!(out, "{:>16}", column.column)?;
    }
    writeln!(out)?;
    let stats: [(&str, fn(&ColumnSummary) -> Option<f64>); 8] = [
        ("count", |c| Some(c.count as f64)),
        ("mean", |c| c.mean),
        ("std", |c| c.std),
        ("min", |c| c.min),
        ("25%", |c| c.p25),
        ("50%", |c| c.median),
        ("75%", |c| c.p75),
        ("max", |c| c.max),
    ];
    for (label, stat) in stats {
        write!(out, "  {label:<8}")?;
        for column in &summary.columns {
            write!(out, "{:>16}", cell(stat(column)))?;
        }
        writeln!(out)?;
    }
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        writeln!(out, "\n  {:<8}{first} .. {last}", "dates")?;
    }
    Ok(())
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string())
}

fn overlay(args: OverlayArgs, settings: Settings, json: bool) -> Result<()> {
    let loaded = load(&args.input, false)?;
    let mut out = open_output(args.output.as_deref())?;

    match args.view {
        OverlayView::Risk => {
            let rows = risk_overlay(&loaded.observations, &loaded.context);
            info!(flagged = rows.len(), "risk overlay built");
            if json {
                serde_json::to_writer_pretty(&mut out, &rows)?;
                writeln!(out)?;
            } else {
                write_risk_overlay_csv(out, &rows)?;
            }
        }
        OverlayView::Inventory => {
            let points = match args.horizon {
                Some(horizon) => ForecastEngine::new(settings.forecast)?
                    .forecast(&loaded.observations, horizon)?,
                None => Vec::new(),
            };
            let timeline = combine_timeline(&loaded.observations, &points);
            let rows = inventory_vs_demand(&timeline, &loaded.context);
            if json {
                serde_json::to_writer_pretty(&mut out, &rows)?;
                writeln!(out)?;
            } else {
                write_inventory_csv(out, &rows)?;
            }
        }
    }
    Ok(())
}

fn generate(args: GenerateArgs) -> Result<()> {
    let seed = args
        .seed
        .unwrap_or_else(|| Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64);
    let end_date = args.end_date.unwrap_or_else(|| Utc::now().date_naive());

    let records = generate_dataset(&GeneratorConfig::new(args.days, end_date, seed))?;
    write_dataset_csv(open_output(args.output.as_deref())?, &records)?;
    info!(rows = records.len(), seed, %end_date, "dataset generated");
    Ok(())
}
