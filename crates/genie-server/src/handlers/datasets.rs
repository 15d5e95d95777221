//! Dataset upload, upload history and table preview handlers

use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    Extension, Json,
};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::info;

use genie_core::{
    load_bytes, schema::ColumnSchema, CleanSummary, DatasetSummary, InsightEngine, LoadOptions,
    NewUpload, UploadRecord, Value,
};

use super::{with_dataset, with_session};
use crate::{AppError, AppState, SessionToken, MAX_PAGE_LIMIT};

/// Result of a successful upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub upload_id: i64,
    pub filename: String,
    pub summary: DatasetSummary,
    /// What the cleaning pass changed
    pub cleaning: CleanSummary,
    pub columns: Vec<ColumnSchema>,
}

/// JSON upload body: file contents base64 encoded
#[derive(Debug, Deserialize)]
pub struct JsonUploadRequest {
    pub filename: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct TableQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

/// Preview of the cleaned table
#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// Row count of the full table, not just the preview
    pub total_rows: usize,
}

/// POST /api/upload - Upload a CSV file
///
/// Expects multipart form with:
/// - file: CSV file (required)
pub async fn upload_multipart(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Failed to read form field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::bad_request("Failed to read file data"))?;
        file = Some((filename, bytes.to_vec()));
    }

    let (filename, data) = file.ok_or_else(|| AppError::bad_request("Missing file field"))?;
    upload_core(&state, &token, filename, data).await
}

/// POST /api/upload/json - Upload a base64-encoded CSV file
pub async fn upload_json(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    Json(req): Json<JsonUploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    let data = base64::engine::general_purpose::STANDARD
        .decode(req.data.trim())
        .map_err(|_| AppError::bad_request("File data is not valid base64"))?;

    upload_core(&state, &token, req.filename, data).await
}

/// Shared upload path - separated from body parsing for testability
///
/// Parsing and cleaning run on the blocking pool without touching the
/// session map. The cleaned dataset is then installed and only after that
/// is the upload recorded, so a failed load or a session that ended
/// meanwhile leaves neither history nor a changed dataset.
pub async fn upload_core(
    state: &AppState,
    token: &str,
    filename: String,
    data: Vec<u8>,
) -> Result<Json<UploadResponse>, AppError> {
    let settings = &state.config.settings;

    if data.len() > settings.max_upload_bytes {
        return Err(AppError::payload_too_large(&format!(
            "File too large. Maximum size is {} bytes",
            settings.max_upload_bytes
        )));
    }
    if filename.trim().is_empty() {
        return Err(AppError::bad_request("Missing filename"));
    }

    let user_id = with_session(state, token, |session| session.user().map(|u| u.id))
        .await?
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let options = LoadOptions::from(settings);
    let (engine, cleaning, upload) =
        tokio::task::spawn_blocking(move || -> genie_core::Result<_> {
            let raw = load_bytes(&filename, &data, &options)?;
            let (engine, cleaning) = InsightEngine::from_raw(&raw);
            Ok((engine, cleaning, NewUpload::from_bytes(&filename, &data)))
        })
        .await?
        .map_err(AppError::from_core)?;

    let engine = Arc::new(engine);
    let summary = engine.summary();
    let columns = engine.schema().columns().to_vec();

    with_session(state, token, |session| session.set_dataset(engine))
        .await?
        .map_err(AppError::from_core)?;

    let upload_id = state
        .db
        .record_upload(user_id, &upload)
        .map_err(AppError::from_core)?;

    info!(
        user_id,
        upload_id,
        rows = summary.rows,
        duplicates_removed = cleaning.duplicates_removed,
        "Dataset uploaded"
    );

    Ok(Json(UploadResponse {
        upload_id,
        filename: upload.filename,
        summary,
        cleaning,
        columns,
    }))
}

/// GET /api/uploads - Upload history of the current user, newest first
pub async fn list_uploads(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Result<Json<Vec<UploadRecord>>, AppError> {
    let user_id = with_session(&state, &token, |session| session.user().map(|u| u.id))
        .await?
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let uploads = state.db.list_uploads(user_id)?;
    Ok(Json(uploads))
}

/// GET /api/table - First rows of the cleaned dataset
pub async fn get_table(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    Query(params): Query<TableQuery>,
) -> Result<Json<TableResponse>, AppError> {
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);

    let response = with_dataset(&state, &token, move |engine| {
        let table = engine.table();
        TableResponse {
            columns: table.columns().to_vec(),
            rows: table.rows().iter().take(limit).cloned().collect(),
            total_rows: table.row_count(),
        }
    })
    .await?;

    Ok(Json(response))
}
