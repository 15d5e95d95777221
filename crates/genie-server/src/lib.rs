//! DataGenie Web Server
//!
//! Axum-based REST API for the DataGenie dataset assistant.
//!
//! Security features:
//! - Username/password login issuing opaque bearer tokens
//! - Idle session expiry
//! - Restrictive CORS policy
//! - Input validation (upload size and row limits, pagination limits)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use genie_core::{Database, GenieConfig};

mod handlers;
pub mod sessions;

pub use sessions::SessionManager;

/// Maximum rows returned by the table preview
pub const MAX_PAGE_LIMIT: usize = 1000;

/// Authorization header carrying the session token
const AUTHORIZATION_HEADER: &str = "authorization";

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Limits, forecast defaults and session timeout
    pub settings: GenieConfig,
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Logged-in sessions keyed by bearer token
    pub sessions: SessionManager,
}

/// Bearer token of the authenticated request, set by `auth_middleware`
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// Extract the bearer token from request headers
pub fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware - requires a live session token
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers()).map(str::to_string);

    match token {
        Some(token) if state.sessions.is_active(&token).await => {
            request.extensions_mut().insert(SessionToken(token));
            next.run(request).await
        }
        _ => {
            warn!(path = %request.uri().path(), "Unauthorized request - no valid session");
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": "Authentication required"
                })),
            )
                .into_response()
        }
    }
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        sessions: SessionManager::new(config.settings.session_timeout),
        config: config.clone(),
    });

    let public_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login));

    let protected_routes = Router::new()
        // Session
        .route("/logout", post(handlers::logout))
        .route("/session", get(handlers::get_session))
        .route("/session/page", post(handlers::set_page))
        // Uploads
        .route("/upload", post(handlers::upload_multipart))
        .route("/upload/json", post(handlers::upload_json))
        .route("/uploads", get(handlers::list_uploads))
        // Dataset
        .route("/table", get(handlers::get_table))
        .route("/statistics", get(handlers::get_statistics))
        .route("/forecast", get(handlers::get_forecast))
        .route("/groups", get(handlers::get_groups))
        .route("/histogram", get(handlers::get_histogram))
        .route("/report", get(handlers::get_report))
        .route("/ask", post(handlers::ask))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Multipart framing and base64 both inflate the payload; the handlers
    // enforce the real limit on the decoded file
    let body_limit = config.settings.max_upload_bytes.saturating_mul(2).max(64 * 1024);

    let api_routes = public_routes
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(body_limit));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' blob: data:; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    info!(
        max_rows = config.settings.max_rows,
        max_upload_bytes = config.settings.max_upload_bytes,
        session_timeout_secs = config.settings.session_timeout.as_secs(),
        "Server limits"
    );

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn payload_too_large(msg: &str) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error to a status; storage failures stay internal
    pub fn from_core(err: genie_core::Error) -> Self {
        use genie_core::Error as E;

        match err {
            E::LoadFailed(_)
            | E::InvalidColumn(_)
            | E::InsufficientData { .. }
            | E::NoNumericColumns
            | E::InvalidData(_) => Self::bad_request(&err.to_string()),
            E::TableTooLarge { .. } => Self::payload_too_large(&err.to_string()),
            E::InvalidTransition(_) => Self::unauthorized(&err.to_string()),
            E::NotFound(_) => Self::not_found(&err.to_string()),
            E::Conflict(_) => Self::conflict(&err.to_string()),
            other => Self::from(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
