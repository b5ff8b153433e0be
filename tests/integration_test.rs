//! Integration tests for Agent Relay
//!
//! Providers are served by wiremock or in-process stubs, so no API keys are needed

use agent_relay::config::OpenAIConfig;
use agent_relay::providers::OpenAIAdapter;
use agent_relay::server::{build_router, ChatResponse, CreateAgentResponse, ErrorResponse, HistoryResponse, StatusResponse};
use agent_relay::storage::InMemoryAgentStore;
use agent_relay::{Dispatcher, HistoryStore, Message, ProviderAdapter, ProviderKind, Relay, RelayError, Settings};
use async_trait::async_trait;
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Echoes the message back with the number of history entries it saw
struct EchoAdapter;

#[async_trait]
impl ProviderAdapter for EchoAdapter {
    fn name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, message: &str, history: &[Message]) -> anyhow::Result<String> {
        Ok(format!("{} ({})", message, history.len()))
    }
}

struct DownAdapter;

#[async_trait]
impl ProviderAdapter for DownAdapter {
    fn name(&self) -> &str {
        "down"
    }

    async fn complete(&self, _message: &str, _history: &[Message]) -> anyhow::Result<String> {
        anyhow::bail!("service unavailable")
    }
}

fn relay_with(dispatcher: Dispatcher) -> Arc<Relay> {
    let settings = Settings::from_defaults().unwrap();
    Arc::new(Relay::new(settings, dispatcher, Arc::new(InMemoryAgentStore::new())))
}

fn stub_relay(max_length: usize) -> Arc<Relay> {
    let history = Arc::new(HistoryStore::new(max_length).unwrap());
    relay_with(
        Dispatcher::new(history)
            .with_adapter(ProviderKind::OpenAI, Arc::new(EchoAdapter))
            .with_adapter(ProviderKind::Grok, Arc::new(DownAdapter)),
    )
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let router = build_router(stub_relay(10));
    let (status, body) = send(&router, empty("GET", "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn test_status_reports_providers_and_conversations() {
    let router = build_router(stub_relay(10));

    let (status, body) = send(&router, empty("GET", "/status")).await;
    assert_eq!(status, StatusCode::OK);
    let report: StatusResponse = decode(&body);
    assert_eq!(report.status, "running");
    assert_eq!(report.providers, vec!["openai", "grok"]);
    assert_eq!(report.conversations, 0);

    send(&router, post_json("/agents/openai-1/chat", json!({"message": "Hello"}))).await;
    let (_, body) = send(&router, empty("GET", "/status")).await;
    let report: StatusResponse = decode(&body);
    assert_eq!(report.conversations, 1);
}

#[tokio::test]
async fn test_status_omits_unconfigured_provider() {
    let history = Arc::new(HistoryStore::new(10).unwrap());
    let router = build_router(relay_with(
        Dispatcher::new(history).with_adapter(ProviderKind::Grok, Arc::new(DownAdapter)),
    ));

    let (_, body) = send(&router, empty("GET", "/status")).await;
    let report: StatusResponse = decode(&body);
    assert_eq!(report.providers, vec!["grok"]);
}

#[tokio::test]
async fn test_chat_round_trip_over_http() {
    let router = build_router(stub_relay(10));

    let (status, body) = send(&router, post_json("/agents/openai-1/chat", json!({"message": "Hello"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decode::<ChatResponse>(&body).message, "Hello (1)");

    let (status, body) = send(&router, empty("GET", "/agents/openai-1/history")).await;
    assert_eq!(status, StatusCode::OK);
    let history: HistoryResponse = decode(&body);
    assert_eq!(history.agent_id, "openai-1");
    assert_eq!(
        history.messages,
        vec![Message::user("Hello"), Message::assistant("Hello (1)")]
    );
}

#[tokio::test]
async fn test_unknown_agent_type_is_bad_request() {
    let relay = stub_relay(10);
    let router = build_router(relay.clone());

    let (status, body) = send(&router, post_json("/agents/abc/chat", json!({"message": "Hello"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(decode::<ErrorResponse>(&body).error, "Unknown agent type");
    assert!(relay.history().snapshot("abc").is_empty());
}

#[tokio::test]
async fn test_empty_message_is_bad_request() {
    let relay = stub_relay(10);
    let router = build_router(relay.clone());

    let (status, _) = send(&router, post_json("/agents/openai-1/chat", json!({"message": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(relay.history().snapshot("openai-1").is_empty());
}

#[tokio::test]
async fn test_provider_failure_maps_to_bad_gateway_and_keeps_user_message() {
    let relay = stub_relay(10);
    let router = build_router(relay.clone());

    let (status, body) = send(&router, post_json("/agents/grok-1/chat", json!({"message": "Hello"}))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(decode::<ErrorResponse>(&body).error, "Error communicating with the agent");
    assert_eq!(relay.history().snapshot("grok-1"), vec![Message::user("Hello")]);
}

#[tokio::test]
async fn test_unconfigured_provider_is_service_unavailable() {
    let history = Arc::new(HistoryStore::new(10).unwrap());
    let relay = relay_with(Dispatcher::new(history));
    let router = build_router(relay);

    let (status, _) = send(&router, post_json("/agents/openai-1/chat", json!({"message": "Hello"}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_clear_history_over_http() {
    let relay = stub_relay(10);
    let router = build_router(relay.clone());

    send(&router, post_json("/agents/openai-1/chat", json!({"message": "Hello"}))).await;
    let (status, _) = send(&router, empty("DELETE", "/agents/openai-1/history")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(relay.history().snapshot("openai-1").is_empty());

    // clearing an unknown agent is fine
    let (status, _) = send(&router, empty("DELETE", "/agents/nobody/history")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_created_agent_is_routable() {
    let router = build_router(stub_relay(10));

    let (status, body) = send(
        &router,
        post_json("/agents", json!({"name": "Console Agent", "type": "openai", "context": "Be nice"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let agent = decode::<CreateAgentResponse>(&body).agent;
    assert_eq!(agent.kind, ProviderKind::OpenAI);

    let uri = format!("/agents/{}/chat", agent.id);
    let (status, body) = send(&router, post_json(&uri, json!({"message": "Hi"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decode::<ChatResponse>(&body).message, "Hi (1)");

    let (status, body) = send(&router, empty("GET", "/agents")).await;
    assert_eq!(status, StatusCode::OK);
    let agents: Vec<agent_relay::Agent> = decode(&body);
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].id, agent.id);
}

#[tokio::test]
async fn test_create_agent_requires_name() {
    let router = build_router(stub_relay(10));
    let (status, body) = send(&router, post_json("/agents", json!({"name": " ", "type": "grok"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(decode::<ErrorResponse>(&body).error, "Agent name is required");
}

#[tokio::test]
async fn test_history_window_with_openai_adapter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Hi there"}}]
        })))
        .mount(&mock_server)
        .await;

    let config = OpenAIConfig {
        base_url: mock_server.uri(),
        model: "gpt-test".to_string(),
        max_tokens: 32,
        temperature: 0.0,
        max_retries: 1,
        retry_base_delay_ms: 0,
        system_prompt: None,
    };
    let history = Arc::new(HistoryStore::new(3).unwrap());
    let dispatcher = Dispatcher::new(history.clone()).with_adapter(
        ProviderKind::OpenAI,
        Arc::new(OpenAIAdapter::new("test-key".to_string(), config)),
    );

    assert_eq!(dispatcher.send("openai-1", "Hello").await.unwrap(), "Hi there");
    assert_eq!(
        history.snapshot("openai-1"),
        vec![Message::user("Hello"), Message::assistant("Hi there")]
    );

    dispatcher.send("openai-1", "Again").await.unwrap();
    assert_eq!(
        history.snapshot("openai-1"),
        vec![
            Message::assistant("Hi there"),
            Message::user("Again"),
            Message::assistant("Hi there"),
        ]
    );

    // the adapter saw at most the bounded window
    let requests = mock_server.received_requests().await.unwrap();
    let last: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(last["messages"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_concurrent_chats_for_distinct_agents_stay_separate() {
    let relay = stub_relay(100);

    let tasks = (0..20).map(|i| {
        let relay = relay.clone();
        async move {
            let agent_id = format!("openai-{}", i % 4);
            relay.chat(&agent_id, &format!("m{}", i)).await
        }
    });
    let results = futures::future::join_all(tasks).await;
    assert!(results.iter().all(Result::is_ok));

    for agent in 0..4 {
        let agent_id = format!("openai-{}", agent);
        let log = relay.history().snapshot(&agent_id);
        assert_eq!(log.len(), 10);
        for message in log.iter().filter(|m| m.role() == agent_relay::Role::User) {
            let n: usize = message.content()[1..].parse().unwrap();
            assert_eq!(n % 4, agent);
        }
    }
}

#[tokio::test]
async fn test_relay_chat_rejects_empty_agent_id() {
    let relay = stub_relay(10);
    assert!(matches!(
        relay.chat("", "Hello").await,
        Err(RelayError::InvalidRequest(_))
    ));
}
