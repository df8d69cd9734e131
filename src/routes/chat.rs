use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use validator::Validate;

use crate::AppState;
use crate::error::AppError;
use crate::models::requests::{AskRequest, is_valid_session_id};
use crate::models::responses::{AskResponse, ClearSessionResponse, TranscriptResponse};

pub(crate) fn check_session_id(session_id: &str) -> Result<(), AppError> {
    if is_valid_session_id(session_id) {
        Ok(())
    } else {
        Err(AppError::validation_error(
            "session_id must be 1-64 characters of letters, digits, '-' or '_'",
        ))
    }
}

// POST /ask
#[utoipa::path(
    post,
    path = "/ask",
    request_body = AskRequest,
    responses(
        (status = 200, body = AskResponse, description = "Guardrailed answer from the fine-tuned model"),
        (status = 422, body = crate::error::ErrorBody, description = "Invalid request body"),
    ),
    tag = "Assistant"
)]
pub async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, AppError> {
    let Json(body) = payload?;
    body.validate()?;

    let response = state.finetuned.answer(&body.text, None).await;
    Ok(Json(AskResponse { response }))
}

// POST /api/v1/chat/sessions/{session_id}/messages
#[utoipa::path(
    post,
    path = "/api/v1/chat/sessions/{session_id}/messages",
    params(("session_id" = String, Path, description = "Caller-chosen session id")),
    request_body = AskRequest,
    responses(
        (status = 200, body = TranscriptResponse, description = "Transcript after the new turn"),
        (status = 422, body = crate::error::ErrorBody, description = "Invalid session id or body"),
    ),
    tag = "Assistant"
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<TranscriptResponse>, AppError> {
    check_session_id(&session_id)?;
    let Json(body) = payload?;
    body.validate()?;

    let answer = state.finetuned.answer(&body.text, None).await;
    let entries = state
        .chat_sessions
        .append(&session_id, &body.text, &answer, None);

    Ok(Json(TranscriptResponse {
        total: entries.len(),
        session_id,
        entries,
    }))
}

// GET /api/v1/chat/sessions/{session_id}
#[utoipa::path(
    get,
    path = "/api/v1/chat/sessions/{session_id}",
    params(("session_id" = String, Path, description = "Caller-chosen session id")),
    responses((status = 200, body = TranscriptResponse, description = "Session transcript")),
    tag = "Assistant"
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<TranscriptResponse>, AppError> {
    check_session_id(&session_id)?;
    let entries = state.chat_sessions.get(&session_id);
    Ok(Json(TranscriptResponse {
        total: entries.len(),
        session_id,
        entries,
    }))
}

// DELETE /api/v1/chat/sessions/{session_id}
#[utoipa::path(
    delete,
    path = "/api/v1/chat/sessions/{session_id}",
    params(("session_id" = String, Path, description = "Caller-chosen session id")),
    responses((status = 200, body = ClearSessionResponse, description = "Session cleared")),
    tag = "Assistant"
)]
pub async fn clear_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ClearSessionResponse>, AppError> {
    check_session_id(&session_id)?;
    let cleared_entries = state.chat_sessions.clear(&session_id);
    Ok(Json(ClearSessionResponse {
        success: true,
        session_id,
        cleared_entries,
    }))
}
