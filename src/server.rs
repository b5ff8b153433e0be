//! HTTP boundary over the relay
//!
//! Decodes requests, maps [`RelayError`] kinds to status codes and encodes
//! replies. All chat semantics live in the dispatcher.

use crate::agents::{Agent, NewAgent};
use crate::core::Message;
use crate::error::RelayError;
use crate::Relay;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

pub type SharedRelay = Arc<Relay>;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAgentResponse {
    pub agent: Agent,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub agent_id: String,
    pub messages: Vec<Message>,
}

/// Runtime overview served at `/status`
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub providers: Vec<String>,
    pub conversations: usize,
}

/// Error body returned for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub struct ApiError(RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            RelayError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            RelayError::InvalidRole(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            RelayError::UnknownAgentType(_) => {
                (StatusCode::BAD_REQUEST, "Unknown agent type".to_string())
            }
            RelayError::ProviderNotConfigured(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.0.to_string())
            }
            RelayError::Provider { .. } => (
                StatusCode::BAD_GATEWAY,
                "Error communicating with the agent".to_string(),
            ),
            RelayError::Storage(_) | RelayError::InvalidConfig(_) => {
                tracing::error!("Request failed: {}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub fn build_router(relay: SharedRelay) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/agents", get(list_agents).post(create_agent))
        .route("/agents/{agent_id}/chat", post(chat))
        .route(
            "/agents/{agent_id}/history",
            get(get_history).delete(clear_history),
        )
        .with_state(relay)
}

/// Bind and serve until the process is stopped
pub async fn serve(relay: SharedRelay, bind: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, build_router(relay)).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn status(State(relay): State<SharedRelay>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        providers: relay
            .dispatcher()
            .configured_providers()
            .into_iter()
            .map(|kind| kind.tag().to_string())
            .collect(),
        conversations: relay.history().agent_ids().len(),
    })
}

async fn create_agent(
    State(relay): State<SharedRelay>,
    Json(request): Json<NewAgent>,
) -> Result<(StatusCode, Json<CreateAgentResponse>), ApiError> {
    let agent = relay.create_agent(request).await?;
    Ok((StatusCode::CREATED, Json(CreateAgentResponse { agent })))
}

async fn list_agents(State(relay): State<SharedRelay>) -> Result<Json<Vec<Agent>>, ApiError> {
    Ok(Json(relay.agent_store().list_agents().await?))
}

async fn chat(
    State(relay): State<SharedRelay>,
    Path(agent_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let reply = relay.chat(&agent_id, &request.message).await?;
    tracing::info!("Chat request for agentID: {}", agent_id);
    Ok(Json(ChatResponse { message: reply }))
}

async fn get_history(
    State(relay): State<SharedRelay>,
    Path(agent_id): Path<String>,
) -> Json<HistoryResponse> {
    let messages = relay.history().snapshot(&agent_id);
    Json(HistoryResponse { agent_id, messages })
}

async fn clear_history(
    State(relay): State<SharedRelay>,
    Path(agent_id): Path<String>,
) -> StatusCode {
    relay.dispatcher().reset(&agent_id);
    StatusCode::NO_CONTENT
}
