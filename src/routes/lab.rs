use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use validator::Validate;

use super::chat::check_session_id;
use crate::AppState;
use crate::error::AppError;
use crate::models::entities::PromptStrategy;
use crate::models::requests::LabAskRequest;
use crate::models::responses::{
    ClearSessionResponse, LabAskResponse, TechniquesResponse, TranscriptResponse,
};

// GET /api/v1/lab/techniques
#[utoipa::path(
    get,
    path = "/api/v1/lab/techniques",
    responses((status = 200, body = TechniquesResponse, description = "Selectable prompting techniques")),
    tag = "Prompt Lab"
)]
pub async fn list_techniques(State(state): State<Arc<AppState>>) -> Json<TechniquesResponse> {
    Json(TechniquesResponse {
        techniques: PromptStrategy::techniques(),
        default: state.prompt_lab.default_strategy(),
    })
}

// POST /api/v1/lab/ask
#[utoipa::path(
    post,
    path = "/api/v1/lab/ask",
    request_body = LabAskRequest,
    responses(
        (status = 200, body = LabAskResponse, description = "Guardrailed answer from the hosted model"),
        (status = 422, body = crate::error::ErrorBody, description = "Unknown technique or invalid body"),
    ),
    tag = "Prompt Lab"
)]
pub async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LabAskRequest>, JsonRejection>,
) -> Result<Json<LabAskResponse>, AppError> {
    let Json(body) = payload?;
    body.validate()?;
    let technique = body
        .parsed_technique()
        .map_err(AppError::validation_error)?
        .unwrap_or(state.prompt_lab.default_strategy());

    let response = state.prompt_lab.answer(&body.text, Some(technique)).await;
    Ok(Json(LabAskResponse {
        response,
        technique,
    }))
}

// POST /api/v1/lab/sessions/{session_id}/messages
#[utoipa::path(
    post,
    path = "/api/v1/lab/sessions/{session_id}/messages",
    params(("session_id" = String, Path, description = "Caller-chosen session id")),
    request_body = LabAskRequest,
    responses(
        (status = 200, body = TranscriptResponse, description = "Transcript after the new turn"),
        (status = 422, body = crate::error::ErrorBody, description = "Invalid session id, technique or body"),
    ),
    tag = "Prompt Lab"
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    payload: Result<Json<LabAskRequest>, JsonRejection>,
) -> Result<Json<TranscriptResponse>, AppError> {
    check_session_id(&session_id)?;
    let Json(body) = payload?;
    body.validate()?;
    let technique = body
        .parsed_technique()
        .map_err(AppError::validation_error)?
        .unwrap_or(state.prompt_lab.default_strategy());

    let answer = state.prompt_lab.answer(&body.text, Some(technique)).await;
    let entries = state
        .lab_sessions
        .append(&session_id, &body.text, &answer, Some(technique));

    Ok(Json(TranscriptResponse {
        total: entries.len(),
        session_id,
        entries,
    }))
}

// GET /api/v1/lab/sessions/{session_id}
#[utoipa::path(
    get,
    path = "/api/v1/lab/sessions/{session_id}",
    params(("session_id" = String, Path, description = "Caller-chosen session id")),
    responses((status = 200, body = TranscriptResponse, description = "Session transcript")),
    tag = "Prompt Lab"
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<TranscriptResponse>, AppError> {
    check_session_id(&session_id)?;
    let entries = state.lab_sessions.get(&session_id);
    Ok(Json(TranscriptResponse {
        total: entries.len(),
        session_id,
        entries,
    }))
}

// DELETE /api/v1/lab/sessions/{session_id}
#[utoipa::path(
    delete,
    path = "/api/v1/lab/sessions/{session_id}",
    params(("session_id" = String, Path, description = "Caller-chosen session id")),
    responses((status = 200, body = ClearSessionResponse, description = "Session cleared")),
    tag = "Prompt Lab"
)]
pub async fn clear_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ClearSessionResponse>, AppError> {
    check_session_id(&session_id)?;
    let cleared_entries = state.lab_sessions.clear(&session_id);
    Ok(Json(ClearSessionResponse {
        success: true,
        session_id,
        cleared_entries,
    }))
}
