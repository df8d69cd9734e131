use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use crate::AppState;
use crate::models::entities::PromptStrategy;
use crate::models::responses::{HealthResponse, ServiceHealth, StatusResponse, SystemStatistics};
use crate::services::assistant::Assistant;

fn assistant_health(assistant: &Assistant) -> ServiceHealth {
    if assistant.is_ready() {
        ServiceHealth::up()
    } else {
        ServiceHealth::down(format!("{} not configured", assistant.backend_name()))
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, body = HealthResponse, description = "Service health check")),
    tag = "Health"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut services = HashMap::new();
    services.insert("gemini_api".to_string(), assistant_health(&state.prompt_lab));
    services.insert("finetuned_model".to_string(), assistant_health(&state.finetuned));
    services.insert(
        "churn_model".to_string(),
        match &state.churn {
            Some(_) => ServiceHealth::up(),
            None => ServiceHealth::down(format!(
                "artifact not loaded from {}",
                state.settings.churn_model_path
            )),
        },
    );

    // Every surface degrades to a message on its own, so the process is
    // healthy as long as at least one of them can serve.
    let any_up = services.values().any(|s| s.status == "up");

    Json(HealthResponse {
        status: if any_up { "healthy" } else { "degraded" }.to_string(),
        timestamp: Utc::now().naive_utc(),
        services,
    })
}

#[utoipa::path(
    get,
    path = "/status",
    responses((status = 200, body = StatusResponse, description = "Detailed service status")),
    tag = "Health"
)]
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: state.settings.app_name.clone(),
        version: state.settings.app_version.clone(),
        environment: state.settings.environment.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        statistics: SystemStatistics {
            lab_sessions: state.lab_sessions.session_count(),
            chat_sessions: state.chat_sessions.session_count(),
            techniques: PromptStrategy::techniques(),
            default_technique: state.prompt_lab.default_strategy(),
        },
        timestamp: Utc::now().naive_utc(),
    })
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service info")),
    tag = "Health"
)]
pub async fn root(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": state.settings.app_name,
        "version": state.settings.app_version,
        "status": "running",
        "docs": "/explore",
        "health": "/health",
        "notice": "This AI provides general health information. It is not a substitute for a doctor. For emergencies, call your local emergency number immediately.",
    }))
}
