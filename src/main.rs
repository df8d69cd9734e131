use std::sync::Arc;

use anyhow::Context;
use tower::make::Shared;

use healthcare_ai_assistant::config::Settings;
use healthcare_ai_assistant::services::ai::AiClient;
use healthcare_ai_assistant::services::churn::ChurnModel;
use healthcare_ai_assistant::{AppState, build_router, with_sentry};

fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    init_tracing(&settings);

    // Sentry must be initialized before the runtime starts
    let _sentry = settings.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: Some(settings.app_version.clone().into()),
                environment: Some(settings.environment.clone().into()),
                traces_sample_rate: settings.sentry_traces_sample_rate,
                ..Default::default()
            },
        ))
    });

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(serve(settings))
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        app = %settings.app_name,
        version = %settings.app_version,
        "Starting server"
    );

    let gemini = AiClient::gemini(
        &settings.gemini_api_key,
        &settings.gemini_base_url,
        &settings.gemini_model,
        settings.gemini_max_tokens,
        settings.gemini_temperature,
        settings.gemini_timeout,
    )?;
    if settings.gemini_api_key.is_empty() {
        tracing::error!("GEMINI_API_KEY not set; prompt lab will answer with a configuration notice");
    }

    let finetuned = AiClient::finetuned(
        &settings.finetuned_base_url,
        &settings.finetuned_api_key,
        &settings.finetuned_model,
        settings.finetuned_max_tokens,
        settings.finetuned_temperature,
        settings.finetuned_top_p,
        settings.finetuned_timeout,
    )?;
    if settings.finetuned_base_url.is_empty() {
        tracing::error!("FINETUNED_BASE_URL not set; /ask will answer with a configuration notice");
    }

    let churn = match ChurnModel::load(&settings.churn_model_path) {
        Ok(model) => {
            tracing::info!(
                path = %settings.churn_model_path,
                columns = model.model_columns().len(),
                "Churn model loaded"
            );
            Some(model)
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Churn model unavailable; /predict will return 503");
            None
        }
    };

    let state = Arc::new(AppState::new(
        settings.clone(),
        Arc::new(gemini),
        Arc::new(finetuned),
        churn,
    ));

    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", settings.host, settings.port);
    tracing::info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    if settings.sentry_dsn.is_some() {
        axum::serve(listener, Shared::new(with_sentry(app)))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")
    } else {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn init_tracing(settings: &Settings) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    if settings.log_format == "json" {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }
}
