//! HTTP-level tests against a local mock server.

use gemini_client::{GeminiClient, GeminiError, GenerateContentRequest, Tool};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-2.5-flash";
const ENDPOINT: &str = "/models/gemini-2.5-flash:generateContent";

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
    }))
}

async fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new("test-key").with_base_url(server.uri())
}

#[tokio::test]
async fn test_generate_content_sends_key_and_tools() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(reply("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let request = GenerateContentRequest::new("bakeries in Austin").tool(Tool::google_maps());
    let response = assert_ok!(client.generate_content(MODEL, &request).await);

    assert_eq!(response.text(), "[]");
    assert_eq!(response.usage_metadata.unwrap().total_token_count, 15);

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["tools"][0], json!({"googleMaps": {}}));
}

#[tokio::test]
async fn test_rate_limit_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = assert_err!(client.generate_text(MODEL, "hi").await);
    assert!(err.is_rate_limited(), "got {err:?}");
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.generate_text(MODEL, "hi").await {
        Err(GeminiError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "internal");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_session_replays_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(reply("[{\"name\":\"A\"}]"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let mut chat = client.chat(MODEL).tool(Tool::google_maps()).build();

    assert_ok!(chat.send_message("first").await);
    assert_ok!(chat.send_message("second").await);
    assert_eq!(chat.history().len(), 4);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    let second: Value = serde_json::from_slice(&received[1].body).unwrap();
    let contents = second["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["parts"][0]["text"], "first");
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[2]["parts"][0]["text"], "second");
}

#[tokio::test]
async fn test_failed_turn_is_rolled_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let mut chat = client.chat(MODEL).build();

    assert_err!(chat.send_message("first").await);
    assert!(chat.history().is_empty());
}
