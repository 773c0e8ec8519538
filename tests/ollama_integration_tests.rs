//! Ollama Integration Tests with Mocked Network Responses
//!
//! These tests use wiremock to mock the Ollama `/api/generate` endpoint and
//! validate:
//! - Request wire shape
//! - Error and empty-answer handling
//! - Fallback across models through `ModelChain`

use serde_json::json;
use std::time::Duration;
use topic_digest::llm::{LLMClient, ModelChain, NO_SUMMARY_SENTINEL, Provider};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============= Helper Functions =============

/// Create a mock Ollama generate response
fn mock_generate_response(model: &str, text: &str) -> serde_json::Value {
    json!({
        "model": model,
        "created_at": "2024-01-01T00:00:00Z",
        "response": text,
        "done": true
    })
}

async fn client_for(server: &MockServer, model: &str) -> Box<dyn LLMClient> {
    Provider::Ollama {
        base_url: server.uri(),
        model: model.to_string(),
        timeout: Duration::from_secs(5),
    }
    .create_client()
    .await
    .expect("client")
}

async fn chain_for(server: &MockServer, models: &[&str]) -> ModelChain {
    let models: Vec<String> = models.iter().map(|m| m.to_string()).collect();
    ModelChain::ollama(&server.uri(), &models, Duration::from_secs(5))
        .await
        .expect("chain")
}

// ============= Single Client =============

#[tokio::test]
async fn test_generate_sends_non_streaming_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3.2",
            "prompt": "Say hi",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_generate_response("llama3.2", "hi")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "llama3.2").await;
    assert_eq!(client.generate("Say hi").await.unwrap(), "hi");
    assert_eq!(client.model_name(), "llama3.2");
}

#[tokio::test]
async fn test_generate_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let client = client_for(&server, "llama3.2").await;
    let err = client.generate("Say hi").await.unwrap_err();
    assert!(err.to_string().contains("Ollama error for model 'llama3.2'"));
}

#[tokio::test]
async fn test_generate_empty_response_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_generate_response("llama3.2", "")))
        .mount(&server)
        .await;

    let client = client_for(&server, "llama3.2").await;
    assert_eq!(client.generate("Say hi").await.unwrap(), "");
}

#[tokio::test]
async fn test_generate_missing_response_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "done": true })))
        .mount(&server)
        .await;

    let client = client_for(&server, "llama3.2").await;
    assert!(client.generate("Say hi").await.is_err());
}

#[tokio::test]
async fn test_generate_invalid_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server, "llama3.2").await;
    assert!(client.generate("Say hi").await.is_err());
}

#[tokio::test]
async fn test_generate_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(mock_generate_response("llama3.2", "late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = Provider::Ollama {
        base_url: server.uri(),
        model: "llama3.2".to_string(),
        timeout: Duration::from_millis(200),
    }
    .create_client()
    .await
    .unwrap();

    assert!(client.generate("Say hi").await.is_err());
}

#[tokio::test]
async fn test_blank_base_url_is_rejected() {
    let result = Provider::Ollama {
        base_url: "  ".to_string(),
        model: "llama3.2".to_string(),
        timeout: Duration::from_secs(1),
    }
    .create_client()
    .await;

    assert!(result.is_err());
}

// ============= Fallback Chain =============

#[tokio::test]
async fn test_chain_falls_back_to_next_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "model": "llama3.2" })))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "model": "mistral" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_generate_response("mistral", "   ")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "model": "gemma2" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(mock_generate_response("gemma2", "Optics studies light.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let chain = chain_for(&server, &["llama3.2", "mistral", "gemma2"]).await;
    assert_eq!(chain.models(), vec!["llama3.2", "mistral", "gemma2"]);

    let summary = chain.summarize_topic("Optics", Some("Light bends.")).await;
    assert_eq!(summary, "Optics studies light.");
}

#[tokio::test]
async fn test_chain_stops_at_first_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "model": "llama3.2" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(mock_generate_response("llama3.2", "\"Linear Algebra\"\nNote: done")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "model": "mistral" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_generate_response("mistral", "unused")))
        .expect(0)
        .mount(&server)
        .await;

    let chain = chain_for(&server, &["llama3.2", "mistral"]).await;
    assert_eq!(chain.translate("Álgebra lineal").await, "Linear Algebra");
}

#[tokio::test]
async fn test_chain_all_unreachable() {
    // Nothing listens on the discard port
    let models = vec!["llama3.2".to_string(), "mistral".to_string()];
    let chain = ModelChain::ollama("http://127.0.0.1:9", &models, Duration::from_secs(2))
        .await
        .unwrap();

    assert_eq!(chain.translate("  Thermodynamik ").await, "Thermodynamik");
    assert_eq!(chain.summarize_content("Heat flows.").await, NO_SUMMARY_SENTINEL);
    assert_eq!(chain.summarize_topic("Heat", None).await, NO_SUMMARY_SENTINEL);
}

#[tokio::test]
async fn test_chain_requires_a_model() {
    assert!(
        ModelChain::ollama("http://localhost:11434", &[], Duration::from_secs(1))
            .await
            .is_err()
    );
}
