//! Model router against a mocked Messages API.

use cultura_core::{CompletionRequest, LlmBackend, LlmError, LlmSettings};
use cultura_skills::{LlmMode, ModelRouter};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn router(server: &MockServer) -> ModelRouter {
    ModelRouter::new(&LlmSettings {
        api_url: server.uri(),
        api_key: Some("sk-test".to_string()),
        ..LlmSettings::default()
    })
    .with_mode(LlmMode::Live)
}

fn request() -> CompletionRequest {
    CompletionRequest::user("claude-test", "What is Wangala?")
        .with_system("You are CULTURA.")
        .with_max_tokens(64)
}

async fn respond_with_status(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(status).set_body_string("{\"error\":\"nope\"}"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn returns_first_text_block() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(serde_json::json!({
            "model": "claude-test",
            "max_tokens": 64,
            "system": "You are CULTURA.",
            "messages": [{ "role": "user", "content": "What is Wangala?" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "msg-test123",
            "type": "message",
            "role": "assistant",
            "content": [{ "type": "text", "text": "Wangala is the Garo harvest festival." }],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = router(&server).complete(request()).await.unwrap();
    assert_eq!(text, "Wangala is the Garo harvest festival.");
}

#[tokio::test]
async fn unauthorized_maps_to_authentication() {
    let server = MockServer::start().await;
    respond_with_status(&server, 401).await;
    assert_eq!(router(&server).complete(request()).await, Err(LlmError::Authentication));
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start().await;
    respond_with_status(&server, 429).await;
    assert_eq!(router(&server).complete(request()).await, Err(LlmError::RateLimited));
}

#[tokio::test]
async fn other_status_keeps_body() {
    let server = MockServer::start().await;
    respond_with_status(&server, 500).await;
    let err = router(&server).complete(request()).await.unwrap_err();
    assert_eq!(
        err,
        LlmError::Http {
            status: 500,
            body: "{\"error\":\"nope\"}".to_string()
        }
    );
}

#[tokio::test]
async fn response_without_text_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "content": [] })))
        .mount(&server)
        .await;

    let err = router(&server).complete(request()).await.unwrap_err();
    assert!(matches!(err, LlmError::Parse(_)));
}
