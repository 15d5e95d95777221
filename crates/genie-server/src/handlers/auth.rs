//! Registration, login and session handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use genie_core::{DatasetSummary, Page, User};

use super::with_session;
use crate::{AppError, AppState, SessionToken, SuccessResponse};

/// Username/password body for register and login
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    pub user: User,
}

/// Current session as seen by the client
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub state: &'static str,
    pub user: Option<User>,
    pub page: Page,
    /// Shape of the loaded dataset, if any
    pub dataset: Option<DatasetSummary>,
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: Page,
}

/// POST /api/register - Create an account
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<Credentials>,
) -> Result<Json<RegisterResponse>, AppError> {
    let id = state
        .db
        .create_user(&req.username, &req.password)
        .map_err(AppError::from_core)?;

    Ok(Json(RegisterResponse {
        id,
        username: req.username.trim().to_string(),
    }))
}

/// POST /api/login - Exchange credentials for a session token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<Credentials>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .db
        .authenticate(&req.username, &req.password)?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    let token = state.sessions.login(user.clone()).await?;
    info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse { token, user }))
}

/// POST /api/logout - End the current session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Json<SuccessResponse> {
    let success = state.sessions.logout(&token).await;
    Json(SuccessResponse { success })
}

/// GET /api/session - Login state, page and dataset shape
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Result<Json<SessionResponse>, AppError> {
    let response = with_session(&state, &token, |session| session_response(session)).await?;
    Ok(Json(response))
}

/// POST /api/session/page - Switch between the Data, Dashboard and Insights views
pub async fn set_page(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    Json(req): Json<PageRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let response = with_session(&state, &token, |session| -> genie_core::Result<_> {
        session.set_page(req.page)?;
        Ok(session_response(session))
    })
    .await?
    .map_err(AppError::from_core)?;

    Ok(Json(response))
}

fn session_response(session: &genie_core::Session) -> SessionResponse {
    SessionResponse {
        state: session.state().as_str(),
        user: session.user().cloned(),
        page: session.page(),
        dataset: session.dataset().map(|engine| engine.summary()),
    }
}
