//! Dataset analysis commands (summary, stats, forecast, groups, histogram, ask, report)
//!
//! Each command loads and cleans the file, then works on the cleaned table.

use std::path::Path;

use anyhow::{Context, Result};
use genie_core::{
    insights::clamp_horizon, load_path, query::format_number, GenieConfig, InsightEngine,
    LoadOptions, Report, ReportFormat,
};
use tracing::debug;

/// Characters in the longest histogram bar
const HISTOGRAM_BAR_WIDTH: usize = 40;

/// Load a CSV or Excel file and clean it into an engine
pub fn load_dataset(file: &Path, config: &GenieConfig) -> Result<InsightEngine> {
    let raw = load_path(file, &LoadOptions::from(config))
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let (engine, cleaning) = InsightEngine::from_raw(&raw);

    debug!(
        rows_before = cleaning.rows_before,
        rows_after = cleaning.rows_after,
        "Dataset cleaned"
    );
    Ok(engine)
}

pub fn cmd_summary(file: &Path, config: &GenieConfig, json: bool) -> Result<()> {
    let raw = load_path(file, &LoadOptions::from(config))
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let (engine, cleaning) = InsightEngine::from_raw(&raw);
    let summary = engine.summary();

    if json {
        let out = serde_json::json!({
            "summary": summary,
            "cleaning": cleaning,
            "columns": engine.schema().columns(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("📊 Dataset Summary");
    println!("   ─────────────────────────────");
    println!("   Rows: {}", summary.rows);
    println!("   Columns: {}", summary.columns);
    println!();
    for col in engine.schema().columns() {
        println!("   {:<24} {}", col.name, col.column_type.as_str());
    }
    println!();
    println!(
        "   Duplicates removed: {} | Missing values filled: {}",
        cleaning.duplicates_removed,
        cleaning.numeric_cells_filled + cleaning.text_cells_filled
    );

    Ok(())
}

pub fn cmd_stats(file: &Path, config: &GenieConfig, json: bool) -> Result<()> {
    let engine = load_dataset(file, config)?;
    let stats = engine.statistics();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    if stats.is_empty() {
        println!("No numeric columns to summarize.");
        return Ok(());
    }

    println!();
    println!("📈 Statistics");
    println!(
        "   {:<20} {:>8} {:>14} {:>14} {:>14} {:>14}",
        "Column", "Count", "Sum", "Mean", "Max", "Min"
    );
    println!("   {}", "─".repeat(88));
    for stat in stats.iter() {
        println!(
            "   {:<20} {:>8} {:>14} {:>14} {:>14} {:>14}",
            stat.name,
            stat.count,
            format_number(stat.sum),
            format_number(stat.mean),
            format_number(stat.max),
            format_number(stat.min)
        );
    }
    println!();

    Ok(())
}

pub fn cmd_forecast(
    file: &Path,
    config: &GenieConfig,
    column: Option<&str>,
    horizon: Option<usize>,
    json: bool,
) -> Result<()> {
    let engine = load_dataset(file, config)?;
    let column = match column {
        Some(c) => c,
        None => engine.default_column()?,
    };
    let horizon = clamp_horizon(horizon.unwrap_or(config.default_horizon));

    let forecast = engine.forecast_next(column)?;
    let series: Vec<f64> = engine.forecast_series(column, horizon)?.collect();

    if json {
        let out = serde_json::json!({ "forecast": forecast, "series": series });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("🔮 Forecast for {}", forecast.column);
    println!(
        "   Trend: y = {:.4}·x + {:.4} ({} observations)",
        forecast.slope, forecast.intercept, forecast.observations
    );
    println!("   Next value: {}", format_number(forecast.predicted));
    if series.len() > 1 {
        for (step, value) in series.iter().enumerate() {
            println!("   +{}: {}", step + 1, format_number(*value));
        }
    }
    println!();

    Ok(())
}

pub fn cmd_groups(
    file: &Path,
    config: &GenieConfig,
    group: &str,
    value: &str,
    json: bool,
) -> Result<()> {
    let engine = load_dataset(file, config)?;
    let groups = engine.group_totals(group, value)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    println!();
    println!("🧮 {} by {}", value, group);
    for g in &groups {
        println!(
            "   {:<24} {:>14}  ({} rows)",
            g.label,
            format_number(g.total),
            g.count
        );
    }
    println!();

    Ok(())
}

pub fn cmd_histogram(
    file: &Path,
    config: &GenieConfig,
    column: Option<&str>,
    bins: usize,
    json: bool,
) -> Result<()> {
    let engine = load_dataset(file, config)?;
    let column = match column {
        Some(c) => c,
        None => engine.default_column()?,
    };
    let histogram = engine.histogram(column, bins)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&histogram)?);
        return Ok(());
    }

    let widest = histogram.bins.iter().map(|b| b.count).max().unwrap_or(0);
    println!();
    println!("📊 Distribution of {}", histogram.column);
    for bin in &histogram.bins {
        let bar = if widest == 0 {
            0
        } else {
            bin.count * HISTOGRAM_BAR_WIDTH / widest
        };
        println!(
            "   {:>12} .. {:<12} {:>6}  {}",
            format_number(bin.start),
            format_number(bin.end),
            bin.count,
            "█".repeat(bar)
        );
    }
    if histogram.missing > 0 {
        println!("   ({} rows without a value)", histogram.missing);
    }
    println!();

    Ok(())
}

pub fn cmd_ask(file: &Path, config: &GenieConfig, question: &str, json: bool) -> Result<()> {
    let engine = load_dataset(file, config)?;
    let answer = engine.ask(question);

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        println!("{}", answer.text);
    }

    Ok(())
}

pub fn cmd_report(
    file: &Path,
    config: &GenieConfig,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let format: ReportFormat = format.parse()?;
    let engine = load_dataset(file, config)?;
    let report = Report::from_engine(&engine);

    match output {
        Some(path) => {
            report
                .write_to(path, format)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("📝 Report written to {}", path.display());
        }
        None => print!("{}", report.render(format)),
    }

    Ok(())
}
