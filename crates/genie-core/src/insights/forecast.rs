//! Linear "next value" forecasting
//!
//! Fits y = slope·x + intercept by ordinary least squares, where x is the
//! zero-based row position and y the column value, then extrapolates past
//! the last row. Closed-form normal equations; no iteration, no randomness.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::table::Table;

/// Minimum observations for a defined fit
const MIN_OBSERVATIONS: usize = 2;

/// Longest multi-step forecast the front ends will produce
pub const MAX_HORIZON: usize = 365;

/// Bound a requested horizon to 1..=MAX_HORIZON
pub fn clamp_horizon(horizon: usize) -> usize {
    horizon.clamp(1, MAX_HORIZON)
}

/// One-step-ahead prediction for a column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub column: String,
    pub slope: f64,
    pub intercept: f64,
    /// Value at x = row count
    pub predicted: f64,
    /// Observations the line was fitted on
    pub observations: usize,
}

/// A fitted line y = slope·x + intercept
#[derive(Debug, Clone, Copy, PartialEq)]
struct LinearFit {
    slope: f64,
    intercept: f64,
}

impl LinearFit {
    fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least squares over (x, y) points
fn fit(points: &[(f64, f64)]) -> Result<LinearFit> {
    if points.len() < MIN_OBSERVATIONS {
        return Err(Error::InsufficientData {
            required: MIN_OBSERVATIONS,
            found: points.len(),
        });
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
        let dx = x - mean_x;
        (sxy + dx * (y - mean_y), sxx + dx * dx)
    });

    // Distinct x positions guarantee sxx > 0 once there are two points
    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Resolve a numeric column and collect its (position, value) points
fn points_for(table: &Table, schema: &Schema, column: &str) -> Result<Vec<(f64, f64)>> {
    let col = schema
        .column(column)
        .ok_or_else(|| Error::InvalidColumn(format!("'{}' does not exist", column)))?;
    if !schema.is_numeric(column) {
        return Err(Error::InvalidColumn(format!(
            "'{}' is not numeric ({})",
            column, col.column_type
        )));
    }

    Ok(table
        .column_values(col.index)
        .enumerate()
        .filter_map(|(x, v)| v.as_number().map(|y| (x as f64, y)))
        .collect())
}

/// Predict the value one position past the end of the table
pub fn forecast_next(table: &Table, column: &str) -> Result<ForecastResult> {
    forecast_with_schema(table, &Schema::resolve(table), column)
}

pub(crate) fn forecast_with_schema(
    table: &Table,
    schema: &Schema,
    column: &str,
) -> Result<ForecastResult> {
    let points = points_for(table, schema, column)?;
    let line = fit(&points)?;
    let next_x = table.row_count() as f64;

    Ok(ForecastResult {
        column: column.to_string(),
        slope: line.slope,
        intercept: line.intercept,
        predicted: line.at(next_x),
        observations: points.len(),
    })
}

/// Predictions for positions n, n+1, ..., n+horizon-1
///
/// Positions past `usize::MAX` are never produced, so an oversized horizon
/// yields a shorter (still lazy) series rather than overflowing.
pub fn forecast_series(table: &Table, column: &str, horizon: usize) -> Result<ForecastSeries> {
    series_with_schema(table, &Schema::resolve(table), column, horizon)
}

pub(crate) fn series_with_schema(
    table: &Table,
    schema: &Schema,
    column: &str,
    horizon: usize,
) -> Result<ForecastSeries> {
    let points = points_for(table, schema, column)?;
    let line = fit(&points)?;
    let start = table.row_count();

    Ok(ForecastSeries {
        line,
        next: start,
        end: start.saturating_add(horizon),
    })
}

/// Finite sequence of extrapolated values.
///
/// Consumed once; fit again to start over.
#[derive(Debug)]
pub struct ForecastSeries {
    line: LinearFit,
    next: usize,
    end: usize,
}

impl Iterator for ForecastSeries {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next >= self.end {
            return None;
        }
        let value = self.line.at(self.next as f64);
        self.next += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ForecastSeries {}
