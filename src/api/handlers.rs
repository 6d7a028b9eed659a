//! HTTP request handlers

use super::assets::serve_static;
use super::sse::sse_stream;
use super::types::{ErrorResponse, InputRequest, SuccessResponse, VersionResponse};
use super::AppState;
use crate::dialogue::Event;
use crate::runtime::{SessionError, SessionView, SseEvent};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router, with every route under `base_path`
pub fn create_router(state: AppState, base_path: &str) -> Router {
    let at = |path: &str| format!("{base_path}{}", path.trim_start_matches('/'));

    let mut router = Router::new()
        // Root serves the widget page
        .route(&at("/"), get(serve_index))
        // Static assets
        .route(&at("/assets/*path"), get(serve_static))
        // Session lifecycle
        .route(&at("/api/sessions"), post(create_session))
        .route(&at("/api/sessions/:id"), get(get_session).delete(delete_session))
        // SSE streaming
        .route(&at("/api/sessions/:id/stream"), get(stream_session))
        // Widget actions
        .route(&at("/api/sessions/:id/open"), post(open_session))
        .route(&at("/api/sessions/:id/close"), post(close_session))
        .route(&at("/api/sessions/:id/input"), post(send_input))
        .route(&at("/api/sessions/:id/draft"), post(edit_input))
        .route(&at("/api/sessions/:id/confirm"), post(confirm_report))
        .route(&at("/api/sessions/:id/restart"), post(restart_session))
        // Version
        .route(&at("/version"), get(get_version));

    // Base path without its trailing slash also lands on the page
    let bare = base_path.trim_end_matches('/');
    if !bare.is_empty() {
        router = router.route(bare, get(serve_index));
    }

    router.with_state(state)
}

// ============================================================
// Page Handler
// ============================================================

async fn serve_index(State(state): State<AppState>) -> Response {
    match state.index_html.as_deref() {
        Some(content) => Html(content.to_string()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - widget page not embedded</h1>".to_string()),
        )
            .into_response(),
    }
}

// ============================================================
// Session Lifecycle
// ============================================================

/// Start a session and open the widget in one call
async fn create_session(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.create().await;
    Ok(Json(handle.apply(Event::Open).await?))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(&id).await?;
    Ok(Json(handle.snapshot().await?))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.sessions.remove(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// SSE Streaming
// ============================================================

async fn stream_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let handle = state.sessions.get(&id).await?;

    // Subscribe before the snapshot so nothing falls between them
    let broadcast_rx = handle.subscribe();
    let view = handle.snapshot().await?;

    Ok(sse_stream(SseEvent::Init { view }, broadcast_rx))
}

// ============================================================
// Widget Actions
// ============================================================

async fn open_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    apply_event(&state, &id, Event::Open).await
}

async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    apply_event(&state, &id, Event::Close).await
}

async fn send_input(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<InputRequest>,
) -> Result<Json<SessionView>, AppError> {
    apply_event(&state, &id, Event::input(req.text)).await
}

async fn edit_input(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<InputRequest>,
) -> Result<Json<SessionView>, AppError> {
    apply_event(&state, &id, Event::EditInput { text: req.text }).await
}

async fn confirm_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    apply_event(&state, &id, Event::Confirm).await
}

async fn restart_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    apply_event(&state, &id, Event::Restart).await
}

async fn apply_event(
    state: &AppState,
    id: &str,
    event: Event,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id).await?;
    Ok(Json(handle.apply(event).await?))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => AppError::NotFound(err.to_string()),
            SessionError::Transition(_) => AppError::BadRequest(err.to_string()),
            SessionError::Closed => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
