mod common;

use common::TestApp;
use gateway_service::services::providers::mock::MockTextProvider;
use gateway_service::services::providers::ProviderError;
use reqwest::StatusCode;
use serde_json::json;

async fn post_text(app: &TestApp, body: serde_json::Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/generate-text", app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn valid_prompt_returns_generated_text() {
    let app = TestApp::spawn(MockTextProvider::replying("Hi there")).await;

    let response = post_text(&app, json!({ "prompt": "Hello" })).await;

    assert_eq!(StatusCode::OK, response.status());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "generatedText": "Hi there" }));
    assert_eq!(app.provider.call_count(), 1);
    assert_eq!(app.provider.last_prompt().as_deref(), Some("Hello"));

    app.cleanup().await;
}

#[tokio::test]
async fn empty_prompt_is_rejected_without_calling_model() {
    let app = TestApp::spawn(MockTextProvider::replying("unused")).await;

    let response = post_text(&app, json!({ "prompt": "" })).await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Prompt is required and must be a non-empty string"
    );
    assert_eq!(app.provider.call_count(), 0);

    app.cleanup().await;
}

#[tokio::test]
async fn whitespace_prompt_is_rejected_without_calling_model() {
    let app = TestApp::spawn(MockTextProvider::replying("unused")).await;

    let response = post_text(&app, json!({ "prompt": "   \t " })).await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status());
    assert_eq!(app.provider.call_count(), 0);

    app.cleanup().await;
}

#[tokio::test]
async fn missing_prompt_is_rejected_without_calling_model() {
    let app = TestApp::spawn(MockTextProvider::replying("unused")).await;

    let response = post_text(&app, json!({})).await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status());
    assert_eq!(app.provider.call_count(), 0);

    app.cleanup().await;
}

#[tokio::test]
async fn non_string_prompt_is_rejected_without_calling_model() {
    let app = TestApp::spawn(MockTextProvider::replying("unused")).await;

    let response = post_text(&app, json!({ "prompt": 42 })).await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Prompt is required and must be a non-empty string"
    );
    assert_eq!(app.provider.call_count(), 0);

    app.cleanup().await;
}

#[tokio::test]
async fn unreachable_model_maps_to_service_unavailable() {
    let app = TestApp::spawn(MockTextProvider::failing(|| {
        ProviderError::Unreachable("connection refused".to_string())
    }))
    .await;

    let response = post_text(&app, json!({ "prompt": "Hello" })).await;

    assert_eq!(StatusCode::SERVICE_UNAVAILABLE, response.status());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Model service unavailable");

    app.cleanup().await;
}

#[tokio::test]
async fn upstream_401_maps_to_unauthorized() {
    let app = TestApp::spawn(MockTextProvider::failing(|| ProviderError::Unauthorized)).await;

    let response = post_text(&app, json!({ "prompt": "Hello" })).await;

    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized access to model API");

    app.cleanup().await;
}

#[tokio::test]
async fn malformed_response_maps_to_bad_gateway() {
    let app = TestApp::spawn(MockTextProvider::failing(|| {
        ProviderError::Malformed("no candidates".to_string())
    }))
    .await;

    let response = post_text(&app, json!({ "prompt": "Hello" })).await;

    assert_eq!(StatusCode::BAD_GATEWAY, response.status());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid response from model");

    app.cleanup().await;
}

#[tokio::test]
async fn other_upstream_errors_map_to_internal_error() {
    let app = TestApp::spawn(MockTextProvider::failing(|| ProviderError::Api {
        status: 500,
        message: "upstream exploded".to_string(),
    }))
    .await;

    let response = post_text(&app, json!({ "prompt": "Hello" })).await;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to generate text");

    app.cleanup().await;
}
