//! DataGenie Core Library
//!
//! Shared functionality for the DataGenie dataset assistant:
//! - Dataset loading (CSV, Excel) into an in-memory table
//! - Cleaning: duplicate removal and missing-value filling
//! - Insight engine: statistics, linear forecasts, grouped totals, histograms
//! - Keyword question answering
//! - Summary report rendering
//! - Login state machine and per-user session context
//! - Database access for users and upload history
//! - Layered configuration

pub mod cleaner;
pub mod config;
pub mod db;
pub mod error;
pub mod insights;
pub mod loader;
pub mod models;
pub mod query;
pub mod report;
pub mod schema;
pub mod session;
pub mod table;

pub use cleaner::{clean, clean_with_summary, CleanSummary};
pub use config::GenieConfig;
pub use db::Database;
pub use error::{Error, Result};
pub use insights::{
    compute_statistics, forecast_next, forecast_series, group_totals, histogram, summarize,
    ColumnStat, DatasetSummary, ForecastResult, ForecastSeries, GroupTotal, Histogram,
    HistogramBin, InsightEngine, Statistics,
};
pub use loader::{load_bytes, load_path, LoadOptions};
pub use models::{NewUpload, UploadRecord, User};
pub use query::{answer, respond, Answer, Intent};
pub use report::{report_lines, Report, ReportFormat};
pub use schema::{ColumnType, Schema};
pub use session::{Page, Session, SessionAction, SessionState};
pub use table::{Table, Value};
