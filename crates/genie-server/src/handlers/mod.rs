//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod ask;
pub mod auth;
pub mod datasets;
pub mod insights;

// Re-export all handlers for use in router
pub use ask::*;
pub use auth::*;
pub use datasets::*;
pub use insights::*;

use std::sync::Arc;

use genie_core::{InsightEngine, Session};

use crate::{AppError, AppState};

/// Run `f` against the caller's session
pub(crate) async fn with_session<R>(
    state: &AppState,
    token: &str,
    f: impl FnOnce(&mut Session) -> R,
) -> Result<R, AppError> {
    state
        .sessions
        .with_session(token, f)
        .await
        .ok_or_else(|| AppError::unauthorized("Session expired"))
}

/// Run `f` against the caller's loaded dataset.
///
/// The session map is only locked long enough to clone the dataset handle;
/// `f` runs on the blocking pool so large tables don't stall the runtime.
pub(crate) async fn with_dataset<R, F>(state: &AppState, token: &str, f: F) -> Result<R, AppError>
where
    F: FnOnce(&InsightEngine) -> R + Send + 'static,
    R: Send + 'static,
{
    let engine: Arc<InsightEngine> = state
        .sessions
        .dataset(token)
        .await
        .ok_or_else(|| AppError::unauthorized("Session expired"))?
        .ok_or_else(|| AppError::not_found("No dataset loaded. Upload a CSV file first."))?;

    let result = tokio::task::spawn_blocking(move || f(&engine)).await?;
    Ok(result)
}
