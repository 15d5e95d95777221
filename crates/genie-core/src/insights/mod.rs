//! Insight Engine - numbers out of a cleaned table
//!
//! Pure, synchronous computations over a [`Table`](crate::table::Table):
//!
//! - **Statistics** - count, sum, mean, max, min per numeric column
//! - **Forecast** - least-squares line over row position, extrapolated forward
//! - **Grouping** - summed values per label and histograms, for dashboard charts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use genie_core::insights::InsightEngine;
//!
//! let (engine, _summary) = InsightEngine::from_raw(&table);
//! let stats = engine.statistics();
//! let next = engine.forecast_next("Sales")?;
//! ```

pub mod engine;
pub mod forecast;
pub mod grouping;
pub mod statistics;

pub use engine::InsightEngine;
pub use forecast::{
    clamp_horizon, forecast_next, forecast_series, ForecastResult, ForecastSeries, MAX_HORIZON,
};
pub use grouping::{
    group_totals, histogram, summarize, DatasetSummary, GroupTotal, Histogram, HistogramBin,
    DEFAULT_BINS, MAX_BINS,
};
pub use statistics::{compute_statistics, ColumnStat, Statistics};
