pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::Request;
use axum::http::{Method, header};
use sentry_tower::{NewSentryLayer, NewSentryService, SentryHttpLayer, SentryHttpService};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use config::Settings;
use models::entities::PromptStrategy;
use services::ai::TextGenerator;
use services::assistant::Assistant;
use services::churn::ChurnModel;
use services::sessions::TranscriptStore;

pub struct AppState {
    pub settings: Settings,
    pub start_time: Instant,
    pub prompt_lab: Assistant,
    pub finetuned: Assistant,
    pub churn: Option<ChurnModel>,
    pub lab_sessions: TranscriptStore,
    pub chat_sessions: TranscriptStore,
}

impl AppState {
    pub fn new(
        settings: Settings,
        lab_generator: Arc<dyn TextGenerator>,
        finetuned_generator: Arc<dyn TextGenerator>,
        churn: Option<ChurnModel>,
    ) -> Self {
        let default_technique = if settings.default_technique.is_technique() {
            settings.default_technique
        } else {
            tracing::warn!(
                technique = %settings.default_technique,
                "DEFAULT_TECHNIQUE is not a prompt lab technique, using Chain-of-Thought"
            );
            PromptStrategy::ChainOfThought
        };

        let prompt_lab = Assistant::prompt_lab(lab_generator, default_technique)
            .with_disclaimer_policy(settings.disclaimer_policy);
        let finetuned =
            Assistant::finetuned(finetuned_generator).with_disclaimer_policy(settings.disclaimer_policy);

        Self {
            lab_sessions: TranscriptStore::new(
                settings.transcript_max_turns,
                settings.transcript_max_sessions,
            ),
            chat_sessions: TranscriptStore::new(
                settings.transcript_max_turns,
                settings.transcript_max_sessions,
            ),
            settings,
            start_time: Instant::now(),
            prompt_lab,
            finetuned,
            churn,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    use axum::routing::{get, post};
    use routes::{chat, health, lab, openapi, predict};

    let cors = build_cors(&state.settings);

    Router::new()
        // Health
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/status", get(health::status))
        // Churn
        .route("/predict", post(predict::predict_churn))
        // Fine-tuned assistant
        .route("/ask", post(chat::ask))
        .route(
            "/api/v1/chat/sessions/{session_id}",
            get(chat::get_session).delete(chat::clear_session),
        )
        .route(
            "/api/v1/chat/sessions/{session_id}/messages",
            post(chat::send_message),
        )
        // Prompt lab
        .route("/api/v1/lab/techniques", get(lab::list_techniques))
        .route("/api/v1/lab/ask", post(lab::ask))
        .route(
            "/api/v1/lab/sessions/{session_id}",
            get(lab::get_session).delete(lab::clear_session),
        )
        .route(
            "/api/v1/lab/sessions/{session_id}/messages",
            post(lab::send_message),
        )
        // Docs
        .merge(openapi::swagger_ui())
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Wrap the finished router in Sentry's hub-per-request and transaction
/// layers. These sit outside the router: `Router::layer` requires `Sync`
/// services and the Sentry service is only `Send`.
pub fn with_sentry(app: Router) -> NewSentryService<SentryHttpService<Router>, Request> {
    ServiceBuilder::new()
        .layer(NewSentryLayer::<Request>::new_from_top())
        .layer(SentryHttpLayer::with_transaction())
        .service(app)
}

fn build_cors(settings: &Settings) -> CorsLayer {
    let origins = settings.cors_origins_list();

    if origins.contains(&"*".to_string()) {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::ORIGIN,
                header::HeaderName::from_static("x-request-id"),
            ])
    }
}
