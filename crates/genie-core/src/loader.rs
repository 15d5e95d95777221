//! Dataset loader
//!
//! Parses uploaded bytes into a [`Table`]. CSV files and the first sheet of
//! an Excel workbook go through the same typing pass. Each column is typed from its
//! cells: numeric when every present cell parses as a number, timestamp when
//! every present cell parses as a date or datetime, text otherwise. Cells
//! matching a null marker ("", "NA", "null", ...) become `Value::Missing`.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::GenieConfig;
use crate::error::{Error, Result};
use crate::table::{Table, Value};

/// Cell contents treated as missing
const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Layout used for workbook date cells before typing
const WORKBOOK_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2024-01-15
    "%m/%d/%Y", // 01/15/2024
    "%m/%d/%y", // 01/15/24
    "%m-%d-%Y", // 01-15-2024
];

/// Limits applied while loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub max_rows: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::from(&GenieConfig::default())
    }
}

impl From<&GenieConfig> for LoadOptions {
    fn from(config: &GenieConfig) -> Self {
        Self {
            max_rows: config.max_rows,
        }
    }
}

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    /// .xlsx, .xlsm or legacy .xls; only the first sheet is read
    Excel,
}

impl SourceFormat {
    /// Pick a format from the file extension
    pub fn from_filename(filename: &str) -> Result<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" | "xlsm" | "xls" => Ok(SourceFormat::Excel),
            "" => Err(Error::LoadFailed(format!(
                "{}: missing file extension (expected .csv or .xlsx)",
                filename
            ))),
            other => Err(Error::LoadFailed(format!(
                "{}: unsupported file type .{} (expected .csv or .xlsx)",
                filename, other
            ))),
        }
    }
}

/// Load a dataset file from disk
pub fn load_path(path: &Path, options: &LoadOptions) -> Result<Table> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let format = SourceFormat::from_filename(filename)?;
    let open_error = |e: std::io::Error| Error::LoadFailed(format!("{}: {}", path.display(), e));

    match format {
        SourceFormat::Csv => load_csv(File::open(path).map_err(open_error)?, options),
        SourceFormat::Excel => load_excel(&std::fs::read(path).map_err(open_error)?, options),
    }
}

/// Load an uploaded file held in memory
pub fn load_bytes(filename: &str, bytes: &[u8], options: &LoadOptions) -> Result<Table> {
    match SourceFormat::from_filename(filename)? {
        SourceFormat::Csv => load_csv(bytes, options),
        SourceFormat::Excel => load_excel(bytes, options),
    }
}

/// Parse CSV data with a header row into a table
pub fn load_csv<R: Read>(reader: R, options: &LoadOptions) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().map_err(load_error)?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(Error::LoadFailed("file has no header row".into()));
    }
    let columns = unique_column_names(headers.iter());
    let width = columns.len();

    let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(load_error)?;
        if record.len() > width {
            return Err(Error::LoadFailed(format!(
                "row {} has {} fields, expected {}",
                line + 1,
                record.len(),
                width
            )));
        }
        if raw_rows.len() == options.max_rows {
            return Err(Error::TableTooLarge {
                rows: raw_rows.len() + 1,
                limit: options.max_rows,
            });
        }

        let mut row: Vec<Option<String>> = record
            .iter()
            .map(|cell| (!is_null_marker(cell)).then(|| cell.to_string()))
            .collect();
        // Short rows are padded, like a spreadsheet with trailing blank cells
        row.resize(width, None);
        raw_rows.push(row);
    }

    let table = type_columns(columns, raw_rows)?;
    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        "Loaded CSV dataset"
    );
    Ok(table)
}

/// Parse the first worksheet of an Excel workbook; its first row is the header
pub fn load_excel(bytes: &[u8], options: &LoadOptions) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(workbook_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::LoadFailed("workbook has no sheets".into()))?
        .map_err(workbook_error)?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|c| workbook_text(c).unwrap_or_default()).collect())
        .unwrap_or_default();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(Error::LoadFailed("first sheet has no header row".into()));
    }
    let columns = unique_column_names(headers.iter().map(String::as_str));

    let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
    for row in rows {
        if raw_rows.len() == options.max_rows {
            return Err(Error::TableTooLarge {
                rows: raw_rows.len() + 1,
                limit: options.max_rows,
            });
        }
        raw_rows.push(
            row.iter()
                .map(|cell| workbook_text(cell).filter(|text| !is_null_marker(text)))
                .collect(),
        );
    }

    let table = type_columns(columns, raw_rows)?;
    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        "Loaded Excel dataset"
    );
    Ok(table)
}

/// Type each column from its present cells and build the table
fn type_columns(columns: Vec<String>, raw_rows: Vec<Vec<Option<String>>>) -> Result<Table> {
    let converters: Vec<CellKind> = (0..columns.len())
        .map(|col| CellKind::detect(raw_rows.iter().filter_map(|r| r[col].as_deref())))
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&converters)
                .map(|(cell, kind)| match cell {
                    Some(text) => kind.convert(text),
                    None => Value::Missing,
                })
                .collect()
        })
        .collect();

    Table::from_rows(columns, rows)
}

/// Workbook cell as the text a CSV export would hold; errors count as missing
fn workbook_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|ts| ts.format(WORKBOOK_TIMESTAMP_FORMAT).to_string()),
        other => Some(other.to_string()),
    }
}

/// SHA-256 of the uploaded bytes, hex encoded
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn load_error(e: csv::Error) -> Error {
    Error::LoadFailed(e.to_string())
}

fn workbook_error(e: impl std::fmt::Display) -> Error {
    Error::LoadFailed(format!("unreadable workbook: {}", e))
}

fn is_null_marker(cell: &str) -> bool {
    let trimmed = cell.trim();
    NULL_MARKERS.contains(&trimmed)
}

/// Blank headers become "Unnamed: i"; repeats get ".1", ".2" suffixes
fn unique_column_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (i, header) in headers.enumerate() {
        let base = match header.trim() {
            "" => format!("Unnamed: {}", i),
            h => h.to_string(),
        };
        let mut name = base.clone();
        let mut n = 1;
        while names.contains(&name) {
            name = format!("{}.{}", base, n);
            n += 1;
        }
        names.push(name);
    }
    names
}

/// How a column's raw cells are converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Number,
    Timestamp,
    Text,
}

impl CellKind {
    fn detect<'a>(mut cells: impl Iterator<Item = &'a str> + Clone) -> Self {
        if cells.clone().all(|c| parse_number(c).is_some()) {
            CellKind::Number
        } else if cells.all(|c| parse_timestamp(c).is_some()) {
            CellKind::Timestamp
        } else {
            CellKind::Text
        }
    }

    fn convert(&self, text: String) -> Value {
        match self {
            CellKind::Number => parse_number(&text).map(Value::Number).unwrap_or(Value::Missing),
            CellKind::Timestamp => parse_timestamp(&text)
                .map(Value::Timestamp)
                .unwrap_or(Value::Missing),
            CellKind::Text => Value::Text(text),
        }
    }
}

/// Parse a finite number; "inf" and friends stay text
fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a date or datetime in common spreadsheet formats
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}
