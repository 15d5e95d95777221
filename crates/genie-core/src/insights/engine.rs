//! Insight Engine - statistics, forecasts and groupings over one table
//!
//! The engine owns a cleaned table together with its schema, resolved once
//! at construction. Every query reuses that schema instead of re-inferring
//! column types per call.

use crate::cleaner::{clean_with_summary, CleanSummary};
use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::table::Table;

use super::forecast::{forecast_with_schema, series_with_schema, ForecastResult, ForecastSeries};
use super::grouping::{
    group_with_schema, histogram_with_schema, summarize, DatasetSummary, GroupTotal, Histogram,
};
use super::statistics::{compute_with_schema, Statistics};

/// A table paired with its resolved schema
#[derive(Debug, Clone, PartialEq)]
pub struct InsightEngine {
    table: Table,
    schema: Schema,
}

impl InsightEngine {
    /// Wrap a table as-is (no cleaning)
    pub fn new(table: Table) -> Self {
        let schema = Schema::resolve(&table);
        Self { table, schema }
    }

    /// Clean a raw table, then wrap it
    pub fn from_raw(raw: &Table) -> (Self, CleanSummary) {
        let (table, summary) = clean_with_summary(raw);
        (Self::new(table), summary)
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    pub fn summary(&self) -> DatasetSummary {
        summarize(&self.table)
    }

    pub fn statistics(&self) -> Statistics {
        compute_with_schema(&self.table, &self.schema)
    }

    pub fn forecast_next(&self, column: &str) -> Result<ForecastResult> {
        forecast_with_schema(&self.table, &self.schema, column)
    }

    pub fn forecast_series(&self, column: &str, horizon: usize) -> Result<ForecastSeries> {
        series_with_schema(&self.table, &self.schema, column, horizon)
    }

    /// Forecast every numeric column, skipping ones with too little data
    pub fn forecast_all(&self) -> Vec<ForecastResult> {
        self.schema
            .numeric_columns()
            .filter_map(|col| match self.forecast_next(&col.name) {
                Ok(result) => Some(result),
                Err(e) => {
                    tracing::debug!(column = %col.name, error = %e, "Skipping forecast");
                    None
                }
            })
            .collect()
    }

    pub fn group_totals(&self, group_column: &str, value_column: &str) -> Result<Vec<GroupTotal>> {
        group_with_schema(&self.table, &self.schema, group_column, value_column)
    }

    pub fn histogram(&self, column: &str, bins: usize) -> Result<Histogram> {
        histogram_with_schema(&self.table, &self.schema, column, bins)
    }

    /// Name of the first numeric column in table order
    pub fn default_column(&self) -> Result<&str> {
        self.schema
            .first_numeric()
            .map(|c| c.name.as_str())
            .ok_or(Error::NoNumericColumns)
    }
}
