//! Dataset summary report
//!
//! Turns statistics and forecasts into ordered, human-readable lines:
//!
//! ```text
//! Dataset Summary:
//! Rows: 2
//! Columns: 2
//!
//! Column: Sales
//! Average: 150.00
//! Max: 200.00
//! Min: 100.00
//!
//! Next predicted value for Sales: 300.00
//! ```
//!
//! Rendered as plain text or Markdown. Page layout is left to the caller.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::insights::{
    summarize, ColumnStat, DatasetSummary, ForecastResult, InsightEngine, Statistics,
};
use crate::table::Table;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Markdown => "markdown",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(Error::InvalidData(format!(
                "Unknown report format '{}' (expected text or markdown)",
                other
            ))),
        }
    }
}

/// Facts gathered for a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: DatasetSummary,
    pub columns: Vec<ColumnStat>,
    pub forecasts: Vec<ForecastResult>,
}

impl Report {
    pub fn new(table: &Table, statistics: &Statistics, forecasts: &[ForecastResult]) -> Self {
        Self {
            summary: summarize(table),
            columns: statistics.iter().cloned().collect(),
            forecasts: forecasts.to_vec(),
        }
    }

    /// Statistics plus a forecast for every numeric column that supports one
    pub fn from_engine(engine: &InsightEngine) -> Self {
        Self {
            summary: engine.summary(),
            columns: engine.statistics().iter().cloned().collect(),
            forecasts: engine.forecast_all(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Dataset Summary:".to_string(),
            format!("Rows: {}", self.summary.rows),
            format!("Columns: {}", self.summary.columns),
            String::new(),
        ];

        for stat in &self.columns {
            lines.push(format!("Column: {}", stat.name));
            lines.push(format!("Average: {:.2}", stat.mean));
            lines.push(format!("Max: {:.2}", stat.max));
            lines.push(format!("Min: {:.2}", stat.min));
            lines.push(String::new());
        }

        for forecast in &self.forecasts {
            lines.push(format!(
                "Next predicted value for {}: {:.2}",
                forecast.column, forecast.predicted
            ));
        }

        lines
    }

    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Text => {
                let mut out = self.lines().join("\n");
                out.push('\n');
                out
            }
            ReportFormat::Markdown => self.render_markdown(),
        }
    }

    fn render_markdown(&self) -> String {
        let mut out = String::from("# Dataset Summary\n\n");
        out.push_str(&format!("- Rows: {}\n", self.summary.rows));
        out.push_str(&format!("- Columns: {}\n", self.summary.columns));

        if !self.columns.is_empty() {
            out.push_str("\n## Columns\n\n");
            out.push_str("| Column | Average | Max | Min |\n");
            out.push_str("|--------|--------:|----:|----:|\n");
            for stat in &self.columns {
                out.push_str(&format!(
                    "| {} | {:.2} | {:.2} | {:.2} |\n",
                    stat.name.replace('|', "\\|"),
                    stat.mean,
                    stat.max,
                    stat.min
                ));
            }
        }

        if !self.forecasts.is_empty() {
            out.push_str("\n## Forecasts\n\n");
            for forecast in &self.forecasts {
                out.push_str(&format!(
                    "- Next predicted value for {}: {:.2}\n",
                    forecast.column, forecast.predicted
                ));
            }
        }

        out
    }

    /// Render and write to a file, replacing any existing content
    pub fn write_to(&self, path: &Path, format: ReportFormat) -> Result<()> {
        fs::write(path, self.render(format))?;
        tracing::info!(path = %path.display(), format = format.as_str(), "Report written");
        Ok(())
    }
}

/// Ordered report lines for a table, its statistics and any forecasts
pub fn report_lines(
    table: &Table,
    statistics: &Statistics,
    forecasts: &[ForecastResult],
) -> Vec<String> {
    Report::new(table, statistics, forecasts).lines()
}
