use analysis::{AnalysisClient, Error};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o",
        "choices": [
            { "index": 0, "finish_reason": "stop", "message": { "role": "assistant", "content": content } }
        ]
    })
}

async fn client_for(server: &MockServer) -> AnalysisClient {
    AnalysisClient::builder()
        .api_base(format!("{}/v1/chat/completions", server.uri()))
        .api_key("test-key")
        .build()
        .unwrap()
}

#[tokio::test]
async fn parses_suggestions_from_completion() {
    let server = MockServer::start().await;

    let content = r#"{"suggestedResponses":[{"situation":"when client says it's too expensive","response":"What budget did you have in mind?","outcome":"surfaces the real constraint"}]}"#;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({ "model": "gpt-4o" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .expect(1)
        .mount(&server)
        .await;

    let suggestions = client_for(&server)
        .await
        .analyze("Client: I think it's too expensive\n\n")
        .await
        .unwrap();

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].response, "What budget did you have in mind?");
}

#[tokio::test]
async fn fenced_json_content_still_parses() {
    let server = MockServer::start().await;

    let content = "```json\n{\"suggestedResponses\": []}\n```";
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .mount(&server)
        .await;

    let suggestions = client_for(&server).await.analyze("Client: hi\n\n").await.unwrap();
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn missing_suggestions_key_defaults_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{}")))
        .mount(&server)
        .await;

    let suggestions = client_for(&server).await.analyze("Client: hi\n\n").await.unwrap();
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn non_success_status_surfaces_api_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .await
        .analyze("Client: hi\n\n")
        .await
        .unwrap_err();

    match error {
        Error::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_content_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("Sure! Here are some suggestions:")),
        )
        .mount(&server)
        .await;

    let error = client_for(&server)
        .await
        .analyze("Client: hi\n\n")
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Parse(_)));
}
