mod common;

use axum::http::StatusCode;
use common::{FakeGenerator, app, app_with, delete, get, post};
use healthcare_ai_assistant::config::Settings;
use healthcare_ai_assistant::services::guardrails::{DISCLAIMER, EMERGENCY_RESPONSE};
use serde_json::json;

#[tokio::test]
async fn test_ask_appends_disclaimer() {
    let finetuned = FakeGenerator::replying("Drink plenty of fluids and rest.");
    let app = app(FakeGenerator::replying("unused"), finetuned.clone());

    let (status, data) = post(&app, "/ask", json!({"text": "How do I treat a cold?"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        data["response"],
        format!("Drink plenty of fluids and rest.\n\n{DISCLAIMER}")
    );

    let prompts = finetuned.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("How do I treat a cold?"));
}

#[tokio::test]
async fn test_ask_emergency_skips_the_model() {
    let finetuned = FakeGenerator::replying("should not be used");
    let app = app(FakeGenerator::replying("unused"), finetuned.clone());

    let (status, data) = post(&app, "/ask", json!({"text": "I think I took an OVERDOSE"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["response"], EMERGENCY_RESPONSE);
    assert!(finetuned.prompts().is_empty());
}

#[tokio::test]
async fn test_ask_standard_keyword_also_triggers_emergency() {
    let app = app(FakeGenerator::replying("unused"), FakeGenerator::replying("unused"));

    let (_, data) = post(&app, "/ask", json!({"text": "sudden chest pain when climbing stairs"})).await;
    assert_eq!(data["response"], EMERGENCY_RESPONSE);
}

#[tokio::test]
async fn test_ask_unconfigured_model_returns_notice() {
    let app = app_with(
        Settings::default(),
        FakeGenerator::replying("unused"),
        FakeGenerator::unconfigured(),
        None,
    );

    let (status, data) = post(&app, "/ask", json!({"text": "chest pain"})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        data["response"]
            .as_str()
            .unwrap()
            .starts_with("Fine-tuned model not loaded.")
    );
}

#[tokio::test]
async fn test_ask_backend_failure_is_reported_as_text() {
    let app = app(
        FakeGenerator::replying("unused"),
        FakeGenerator::failing("connection refused"),
    );

    let (status, data) = post(&app, "/ask", json!({"text": "What is anemia?"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        data["response"],
        "Error communicating with the fake model: connection refused"
    );
}

#[tokio::test]
async fn test_ask_missing_text_is_rejected() {
    let app = app(FakeGenerator::replying("unused"), FakeGenerator::replying("unused"));

    let (status, data) = post(&app, "/ask", json!({"question": "hi"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(data["error"], "validation_error");
}

#[tokio::test]
async fn test_ask_overlong_text_is_rejected() {
    let app = app(FakeGenerator::replying("unused"), FakeGenerator::replying("unused"));

    let (status, _) = post(&app, "/ask", json!({"text": "a".repeat(4001)})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_chat_session_lifecycle() {
    let app = app(FakeGenerator::replying("unused"), FakeGenerator::replying("Rest well."));

    let (status, data) = post(
        &app,
        "/api/v1/chat/sessions/alice-1/messages",
        json!({"text": "I have a headache"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["session_id"], "alice-1");
    assert_eq!(data["total"], 1);
    assert_eq!(data["entries"][0]["query"], "I have a headache");
    assert!(data["entries"][0]["id"].is_string());
    assert!(data["entries"][0].get("technique").is_none());

    post(
        &app,
        "/api/v1/chat/sessions/alice-1/messages",
        json!({"text": "Is it serious?"}),
    )
    .await;

    let (status, data) = get(&app, "/api/v1/chat/sessions/alice-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["total"], 2);
    assert_eq!(data["entries"][1]["query"], "Is it serious?");

    let (status, data) = delete(&app, "/api/v1/chat/sessions/alice-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["success"], true);
    assert_eq!(data["cleared_entries"], 2);

    let (_, data) = get(&app, "/api/v1/chat/sessions/alice-1").await;
    assert_eq!(data["total"], 0);
}

#[tokio::test]
async fn test_chat_sessions_are_isolated() {
    let app = app(FakeGenerator::replying("unused"), FakeGenerator::replying("ok"));

    post(&app, "/api/v1/chat/sessions/a/messages", json!({"text": "first"})).await;
    post(&app, "/api/v1/chat/sessions/b/messages", json!({"text": "second"})).await;

    let (_, a) = get(&app, "/api/v1/chat/sessions/a").await;
    let (_, b) = get(&app, "/api/v1/chat/sessions/b").await;
    assert_eq!(a["total"], 1);
    assert_eq!(a["entries"][0]["query"], "first");
    assert_eq!(b["total"], 1);
    assert_eq!(b["entries"][0]["query"], "second");
}

#[tokio::test]
async fn test_chat_transcript_is_capped() {
    let settings = Settings {
        transcript_max_turns: 2,
        ..Settings::default()
    };
    let app = app_with(
        settings,
        FakeGenerator::replying("unused"),
        FakeGenerator::replying("ok"),
        None,
    );

    for text in ["one", "two", "three"] {
        post(&app, "/api/v1/chat/sessions/capped/messages", json!({"text": text})).await;
    }

    let (_, data) = get(&app, "/api/v1/chat/sessions/capped").await;
    assert_eq!(data["total"], 2);
    assert_eq!(data["entries"][0]["query"], "two");
    assert_eq!(data["entries"][1]["query"], "three");
}

#[tokio::test]
async fn test_chat_session_count_is_capped() {
    let settings = Settings {
        transcript_max_sessions: 2,
        ..Settings::default()
    };
    let app = app_with(
        settings,
        FakeGenerator::replying("unused"),
        FakeGenerator::replying("ok"),
        None,
    );

    for id in ["first", "second", "third", "fourth"] {
        post(&app, &format!("/api/v1/chat/sessions/{id}/messages"), json!({"text": "hi"})).await;
    }

    let (_, status) = get(&app, "/status").await;
    assert_eq!(status["statistics"]["chat_sessions"], 2);

    let (_, first) = get(&app, "/api/v1/chat/sessions/first").await;
    assert_eq!(first["total"], 0);
    let (_, fourth) = get(&app, "/api/v1/chat/sessions/fourth").await;
    assert_eq!(fourth["total"], 1);
}

#[tokio::test]
async fn test_chat_invalid_session_id() {
    let app = app(FakeGenerator::replying("unused"), FakeGenerator::replying("ok"));

    let (status, data) = get(&app, "/api/v1/chat/sessions/bad.id").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(data["error"], "validation_error");
}
