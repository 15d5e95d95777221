//! In-memory tabular dataset
//!
//! A [`Table`] is an ordered list of column names plus rows of [`Value`]s
//! aligned to those columns. Every row has exactly one value per column, so
//! all records share the same column set by construction.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{Error, Result};

/// A single cell
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Timestamp(NaiveDateTime),
    Missing,
}

impl Value {
    /// True for `Missing` and for NaN numbers
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// The numeric payload, if this is a non-NaN number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Canonical bit pattern used for record identity.
    ///
    /// Folds `-0.0` into `0.0` and every NaN into one pattern.
    fn number_key(n: f64) -> u64 {
        if n.is_nan() {
            f64::NAN.to_bits()
        } else if n == 0.0 {
            0
        } else {
            n.to_bits()
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (a, b) if a.is_missing() && b.is_missing() => true,
            (Value::Number(a), Value::Number(b)) => Self::number_key(*a) == Self::number_key(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_missing() {
            state.write_u8(0);
            return;
        }
        match self {
            Value::Number(n) => {
                state.write_u8(1);
                state.write_u64(Self::number_key(*n));
            }
            Value::Text(s) => {
                state.write_u8(2);
                s.hash(state);
            }
            Value::Timestamp(ts) => {
                state.write_u8(3);
                ts.hash(state);
            }
            Value::Missing => unreachable!("handled above"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            v if v.is_missing() => Ok(()),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Timestamp(ts) => {
                if ts.time() == chrono::NaiveTime::MIN {
                    write!(f, "{}", ts.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            Value::Missing => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

/// Rows × named columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given columns
    ///
    /// Fails if there are no columns or a column name repeats.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::InvalidData(
                "table must have at least one column".into(),
            ));
        }
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(Error::InvalidData(format!("duplicate column name: {}", name)));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Create a table from columns and rows, validating every row width
    pub fn from_rows<S: Into<String>>(columns: Vec<S>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut table = Self::new(columns.into_iter().map(Into::into).collect())?;
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a record
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::InvalidData(format!(
                "row {} has {} values, expected {}",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// A new table with the same columns and different rows.
    ///
    /// Callers must keep the row width; this is how the cleaner replaces a table.
    pub(crate) fn with_rows(&self, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == self.columns.len()));
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate one column's values top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Look up a cell by row position and column name
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// First `limit` rows as a new table (for previews)
    pub fn head(&self, limit: usize) -> Self {
        self.with_rows(self.rows.iter().take(limit).cloned().collect())
    }
}
