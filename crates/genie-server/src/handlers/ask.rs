//! Question answering handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use tracing::debug;

use genie_core::Answer;

use super::with_dataset;
use crate::{AppError, AppState, SessionToken};

/// Longest question accepted
const MAX_QUESTION_LEN: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// POST /api/ask - Answer a question about the loaded dataset
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    Json(req): Json<AskRequest>,
) -> Result<Json<Answer>, AppError> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(AppError::bad_request("Question cannot be empty"));
    }
    if question.len() > MAX_QUESTION_LEN {
        return Err(AppError::bad_request(&format!(
            "Question too long (max {} characters)",
            MAX_QUESTION_LEN
        )));
    }

    let question = question.to_string();
    let answer = with_dataset(&state, &token, move |engine| engine.ask(&question)).await?;
    debug!(intent = %answer.intent, "Question answered");

    Ok(Json(answer))
}
