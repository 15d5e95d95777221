//! Statistics, forecast, grouping, histogram and report handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use genie_core::insights::{clamp_horizon, DEFAULT_BINS};
use genie_core::{ForecastResult, GroupTotal, Histogram, Report, ReportFormat, Statistics};

use super::with_dataset;
use crate::{AppError, AppState, SessionToken};

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    /// Defaults to the first numeric column
    pub column: Option<String>,
    pub horizon: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub forecast: ForecastResult,
    /// Extrapolated values for the next `horizon` positions
    pub series: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct GroupQuery {
    pub group: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct HistogramQuery {
    /// Defaults to the first numeric column
    pub column: Option<String>,
    pub bins: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub format: &'static str,
    pub lines: Vec<String>,
    pub rendered: String,
    pub report: Report,
}

/// GET /api/statistics - Count, sum, mean, max and min per numeric column
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Result<Json<Statistics>, AppError> {
    let stats = with_dataset(&state, &token, |engine| engine.statistics()).await?;
    Ok(Json(stats))
}

/// GET /api/forecast - Linear forecast of one numeric column
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, AppError> {
    let horizon = clamp_horizon(
        params
            .horizon
            .unwrap_or(state.config.settings.default_horizon),
    );

    let response = with_dataset(&state, &token, move |engine| -> genie_core::Result<_> {
        let column = match params.column.as_deref() {
            Some(name) => name,
            None => engine.default_column()?,
        };
        Ok(ForecastResponse {
            forecast: engine.forecast_next(column)?,
            series: engine.forecast_series(column, horizon)?.collect(),
        })
    })
    .await?
    .map_err(AppError::from_core)?;

    Ok(Json(response))
}

/// GET /api/groups - Totals of a value column per distinct label
pub async fn get_groups(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    Query(params): Query<GroupQuery>,
) -> Result<Json<Vec<GroupTotal>>, AppError> {
    let groups = with_dataset(&state, &token, move |engine| {
        engine.group_totals(&params.group, &params.value)
    })
    .await?
    .map_err(AppError::from_core)?;

    Ok(Json(groups))
}

/// GET /api/histogram - Equal-width bucket counts of a numeric column
pub async fn get_histogram(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    Query(params): Query<HistogramQuery>,
) -> Result<Json<Histogram>, AppError> {
    let bins = params.bins.unwrap_or(DEFAULT_BINS);

    let histogram = with_dataset(&state, &token, move |engine| -> genie_core::Result<_> {
        let column = match params.column.as_deref() {
            Some(name) => name,
            None => engine.default_column()?,
        };
        engine.histogram(column, bins)
    })
    .await?
    .map_err(AppError::from_core)?;

    Ok(Json(histogram))
}

/// GET /api/report - Summary report as lines and rendered text
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, AppError> {
    let format: ReportFormat = match params.format.as_deref() {
        Some(f) => f.parse().map_err(AppError::from_core)?,
        None => ReportFormat::default(),
    };

    let report = with_dataset(&state, &token, Report::from_engine).await?;

    Ok(Json(ReportResponse {
        format: format.as_str(),
        lines: report.lines(),
        rendered: report.render(format),
        report,
    }))
}
