#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use futures::future::BoxFuture;
use serde_json::{Value, json};
use tower::ServiceExt;

use healthcare_ai_assistant::config::Settings;
use healthcare_ai_assistant::error::AppError;
use healthcare_ai_assistant::services::ai::TextGenerator;
use healthcare_ai_assistant::services::churn::ChurnModel;
use healthcare_ai_assistant::{AppState, build_router};

pub const CHURN_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/churn_model.json");

/// Generation backend that replies with a canned text and records every prompt.
pub struct FakeGenerator {
    name: &'static str,
    configured: bool,
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            name: "fake model",
            configured: true,
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            name: "fake model",
            configured: true,
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            name: "fake model",
            configured: false,
            reply: Ok(String::new()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextGenerator for FakeGenerator {
    fn name(&self) -> &str {
        self.name
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AppError>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self
            .reply
            .clone()
            .map_err(AppError::service_unavailable);
        Box::pin(async move { reply })
    }
}

pub fn churn_model() -> ChurnModel {
    ChurnModel::load(CHURN_FIXTURE).expect("fixture churn model should load")
}

pub fn app_with(
    settings: Settings,
    lab: Arc<FakeGenerator>,
    finetuned: Arc<FakeGenerator>,
    churn: Option<ChurnModel>,
) -> Router {
    let state = AppState::new(settings, lab, finetuned, churn);
    build_router(Arc::new(state))
}

/// Router with both assistants configured and the fixture churn model loaded.
pub fn app(lab: Arc<FakeGenerator>, finetuned: Arc<FakeGenerator>) -> Router {
    app_with(Settings::default(), lab, finetuned, Some(churn_model()))
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

/// A loyal DSL customer on a one-year contract.
pub fn sample_customer() -> Value {
    json!({
        "gender": "Male",
        "SeniorCitizen": 0,
        "Partner": "Yes",
        "Dependents": "No",
        "tenure": 24,
        "PhoneService": "Yes",
        "MultipleLines": "No",
        "InternetService": "DSL",
        "OnlineSecurity": "Yes",
        "OnlineBackup": "No",
        "DeviceProtection": "Yes",
        "TechSupport": "No",
        "StreamingTV": "No",
        "StreamingMovies": "No",
        "Contract": "One year",
        "PaperlessBilling": "Yes",
        "PaymentMethod": "Mailed check",
        "MonthlyCharges": 59.9,
        "TotalCharges": 1400.55
    })
}
