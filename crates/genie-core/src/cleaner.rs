//! Dataset cleaning
//!
//! Fixed policy, no configuration:
//! 1. Drop records identical to an earlier record (first occurrence wins).
//! 2. Fill missing numeric cells with the column mean computed after step 1.
//! 3. Fill missing cells of text and timestamp columns with `"Unknown"`.
//! 4. Drop records that became identical through filling.
//!
//! A column with no values at all has no mean; it is left missing.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::schema::{ColumnType, Schema};
use crate::table::{Table, Value};

/// Placeholder for missing non-numeric cells
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

/// What a cleaning pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    pub duplicates_removed: usize,
    pub numeric_cells_filled: usize,
    pub text_cells_filled: usize,
    /// Columns with no values, left missing
    pub empty_columns: Vec<String>,
}

/// Clean a table, returning a new one
pub fn clean(table: &Table) -> Table {
    clean_with_summary(table).0
}

/// Clean a table and report what changed
pub fn clean_with_summary(table: &Table) -> (Table, CleanSummary) {
    let mut summary = CleanSummary {
        rows_before: table.row_count(),
        ..Default::default()
    };

    let mut rows = dedupe(table.rows().iter().cloned());
    let first_pass_removed = table.row_count() - rows.len();

    let deduped = table.with_rows(rows.clone());
    let schema = Schema::resolve(&deduped);

    let fills: Vec<Option<Value>> = schema
        .columns()
        .iter()
        .map(|col| match col.column_type {
            ColumnType::Numeric => column_mean(&deduped, col.index).map(Value::Number),
            ColumnType::Text | ColumnType::Timestamp => {
                Some(Value::Text(UNKNOWN_PLACEHOLDER.to_string()))
            }
            ColumnType::Empty => {
                summary.empty_columns.push(col.name.clone());
                None
            }
        })
        .collect();

    for row in rows.iter_mut() {
        for (idx, cell) in row.iter_mut().enumerate() {
            if !cell.is_missing() {
                continue;
            }
            if let Some(fill) = &fills[idx] {
                match fill {
                    Value::Number(_) => summary.numeric_cells_filled += 1,
                    _ => summary.text_cells_filled += 1,
                }
                *cell = fill.clone();
            }
        }
    }

    let rows = dedupe(rows.into_iter());
    summary.rows_after = rows.len();
    summary.duplicates_removed = summary.rows_before - summary.rows_after;

    debug!(
        rows_before = summary.rows_before,
        rows_after = summary.rows_after,
        duplicates = first_pass_removed,
        fill_duplicates = summary.duplicates_removed - first_pass_removed,
        numeric_filled = summary.numeric_cells_filled,
        text_filled = summary.text_cells_filled,
        "Cleaned dataset"
    );

    (table.with_rows(rows), summary)
}

/// Keep the first occurrence of each record, preserving order
fn dedupe(rows: impl Iterator<Item = Vec<Value>>) -> Vec<Vec<Value>> {
    let mut seen: HashSet<Vec<Value>> = HashSet::new();
    rows.filter(|row| seen.insert(row.clone())).collect()
}

/// Mean of the present numbers in a column
fn column_mean(table: &Table, index: usize) -> Option<f64> {
    let (sum, count) = table
        .column_values(index)
        .filter_map(Value::as_number)
        .fold((0.0, 0usize), |(sum, count), n| (sum + n, count + 1));
    (count > 0).then(|| sum / count as f64)
}
