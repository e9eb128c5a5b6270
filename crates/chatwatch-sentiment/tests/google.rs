//! Integration tests for `GoogleLanguageClient` using wiremock HTTP mocks.

use chatwatch_sentiment::{GoogleLanguageClient, SentimentError, SentimentScorer};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GoogleLanguageClient {
    GoogleLanguageClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn score_parses_document_sentiment() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/documents:analyzeSentiment"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "document": { "type": "PLAIN_TEXT", "content": "I am fine" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documentSentiment": { "score": -0.7, "magnitude": 0.9 },
            "languageCode": "en"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let score = client.score("I am fine").await.expect("should parse score");
    assert!((score.score - (-0.7)).abs() < f32::EPSILON);
    assert!((score.magnitude - 0.9).abs() < f32::EPSILON);
}

#[tokio::test]
async fn score_defaults_missing_fields_to_zero() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/documents:analyzeSentiment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documentSentiment": {}
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let score = client.score("neutral").await.expect("should parse");
    assert_eq!(score.score, 0.0);
    assert_eq!(score.magnitude, 0.0);
}

#[tokio::test]
async fn score_surfaces_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/documents:analyzeSentiment"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 400, "message": "Invalid document" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.score("whatever").await;
    match result {
        Err(SentimentError::ApiError(msg)) => {
            assert!(msg.contains("400"), "error should carry the status: {msg}");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}
