//! Typed column view of a table
//!
//! Column types are resolved once from the values present, then queried by
//! name or index instead of re-inspecting cells at every call site.

use serde::Serialize;
use std::fmt;

use crate::table::{Table, Value};

/// Resolved type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Every present value is a number
    Numeric,
    /// Every present value is a timestamp
    Timestamp,
    /// Free text, or a mix of kinds
    Text,
    /// No present values at all
    Empty,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Text => "text",
            ColumnType::Empty => "empty",
        }
    }

    /// Resolve the type of a sequence of cells
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut resolved = ColumnType::Empty;
        for value in values {
            let kind = match value {
                v if v.is_missing() => continue,
                Value::Number(_) => ColumnType::Numeric,
                Value::Timestamp(_) => ColumnType::Timestamp,
                _ => ColumnType::Text,
            };
            resolved = match resolved {
                ColumnType::Empty => kind,
                current if current == kind => current,
                _ => return ColumnType::Text,
            };
        }
        resolved
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    pub index: usize,
    pub column_type: ColumnType,
}

/// Column types for one table snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
}

impl Schema {
    pub fn resolve(table: &Table) -> Self {
        let columns = table
            .columns()
            .iter()
            .enumerate()
            .map(|(index, name)| ColumnSchema {
                name: name.clone(),
                index,
                column_type: ColumnType::infer(table.column_values(index)),
            })
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn by_index(&self, index: usize) -> Option<&ColumnSchema> {
        self.columns.get(index)
    }

    /// Numeric columns in table order
    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnSchema> + '_ {
        self.columns
            .iter()
            .filter(|c| c.column_type == ColumnType::Numeric)
    }

    pub fn first_numeric(&self) -> Option<&ColumnSchema> {
        self.numeric_columns().next()
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.column(name)
            .map(|c| c.column_type == ColumnType::Numeric)
            .unwrap_or(false)
    }
}
