//! Grouped totals, histograms and dataset shape
//!
//! Chart-ready data for the dashboard: one summed value per distinct label
//! of a grouping column, or equal-width bucket counts of a numeric column.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cleaner::UNKNOWN_PLACEHOLDER;
use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::table::{Table, Value};

/// Row and column counts of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
}

/// Summed value for one group label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub label: String,
    pub total: f64,
    /// Records in the group, including those with a missing value
    pub count: usize,
}

/// Bucket count used when the caller gives none
pub const DEFAULT_BINS: usize = 10;

/// Largest bucket count accepted
pub const MAX_BINS: usize = 100;

/// Values in the half-open range [start, end); the last bin also holds `end`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Distribution of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
    /// Rows with no value, not counted in any bin
    pub missing: usize,
}

pub fn summarize(table: &Table) -> DatasetSummary {
    DatasetSummary {
        rows: table.row_count(),
        columns: table.column_count(),
    }
}

/// Sum `value_column` per distinct label of `group_column`, sorted by label
pub fn group_totals(
    table: &Table,
    group_column: &str,
    value_column: &str,
) -> Result<Vec<GroupTotal>> {
    group_with_schema(table, &Schema::resolve(table), group_column, value_column)
}

pub(crate) fn group_with_schema(
    table: &Table,
    schema: &Schema,
    group_column: &str,
    value_column: &str,
) -> Result<Vec<GroupTotal>> {
    let group = schema
        .column(group_column)
        .ok_or_else(|| Error::InvalidColumn(format!("'{}' does not exist", group_column)))?;
    let value = schema
        .column(value_column)
        .ok_or_else(|| Error::InvalidColumn(format!("'{}' does not exist", value_column)))?;
    if !schema.is_numeric(value_column) {
        return Err(Error::InvalidColumn(format!(
            "'{}' is not numeric ({})",
            value_column, value.column_type
        )));
    }

    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for row in table.rows() {
        let label = match &row[group.index] {
            Value::Missing => UNKNOWN_PLACEHOLDER.to_string(),
            v => v.to_string(),
        };
        let entry = groups.entry(label).or_insert((0.0, 0));
        entry.0 += row[value.index].as_number().unwrap_or(0.0);
        entry.1 += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(label, (total, count))| GroupTotal {
            label,
            total,
            count,
        })
        .collect())
}

/// Count the values of `column` into `bins` equal-width buckets
/// spanning min..=max
pub fn histogram(table: &Table, column: &str, bins: usize) -> Result<Histogram> {
    histogram_with_schema(table, &Schema::resolve(table), column, bins)
}

pub(crate) fn histogram_with_schema(
    table: &Table,
    schema: &Schema,
    column: &str,
    bins: usize,
) -> Result<Histogram> {
    if bins == 0 || bins > MAX_BINS {
        return Err(Error::InvalidData(format!(
            "bin count must be between 1 and {}, got {}",
            MAX_BINS, bins
        )));
    }
    let col = schema
        .column(column)
        .ok_or_else(|| Error::InvalidColumn(format!("'{}' does not exist", column)))?;
    if !schema.is_numeric(column) {
        return Err(Error::InvalidColumn(format!(
            "'{}' is not numeric ({})",
            column, col.column_type
        )));
    }

    let values: Vec<f64> = table
        .column_values(col.index)
        .filter_map(Value::as_number)
        .collect();
    let missing = table.row_count() - values.len();

    let (min, max) = match values.iter().copied().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    }) {
        Some(range) => range,
        None => {
            return Ok(Histogram {
                column: column.to_string(),
                bins: Vec::new(),
                missing,
            })
        }
    };

    // A constant column has no width to split
    let bins = if min == max { 1 } else { bins };
    let width = (max - min) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in &values {
        let slot = if width > 0.0 {
            (((v - min) / width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[slot] += 1;
    }

    Ok(Histogram {
        column: column.to_string(),
        bins: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: min + width * i as f64,
                end: if i + 1 == bins {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count,
            })
            .collect(),
        missing,
    })
}
