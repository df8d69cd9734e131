use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use super::entities::{ChurnLabel, PromptStrategy, TranscriptEntry};

#[derive(Debug, Serialize, ToSchema)]
pub struct AskResponse {
    pub response: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LabAskResponse {
    pub response: String,
    pub technique: PromptStrategy,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChurnPredictionResponse {
    pub churn_probability: f64,
    pub prediction: ChurnLabel,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TechniquesResponse {
    pub techniques: Vec<PromptStrategy>,
    pub default: PromptStrategy,
}

// ── Sessions ──

#[derive(Debug, Serialize, ToSchema)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub entries: Vec<TranscriptEntry>,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearSessionResponse {
    pub success: bool,
    pub session_id: String,
    pub cleared_entries: usize,
}

// ── Health / Status ──

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ServiceHealth {
    pub fn up() -> Self {
        Self {
            status: "up".to_string(),
            detail: None,
        }
    }

    pub fn down(detail: impl Into<String>) -> Self {
        Self {
            status: "down".to_string(),
            detail: Some(detail.into()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: NaiveDateTime,
    pub services: HashMap<String, ServiceHealth>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub service: String,
    pub version: String,
    pub environment: String,
    pub uptime_seconds: u64,
    pub statistics: SystemStatistics,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SystemStatistics {
    pub lab_sessions: usize,
    pub chat_sessions: usize,
    pub techniques: Vec<PromptStrategy>,
    pub default_technique: PromptStrategy,
}
