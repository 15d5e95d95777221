//! Error types for DataGenie

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Upstream parse failure; the dataset never reached the engine
    #[error("Failed to load dataset: {0}")]
    LoadFailed(String),

    #[error("Dataset too large: {rows} rows exceeds the limit of {limit}")]
    TableTooLarge { rows: usize, limit: usize },

    /// Requested column is absent or not numeric
    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    #[error("Insufficient data: need at least {required} values, found {found}")]
    InsufficientData { required: usize, found: usize },

    #[error("Dataset has no numeric columns")]
    NoNumericColumns,

    #[error("Invalid session transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
