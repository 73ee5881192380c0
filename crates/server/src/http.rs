//! HTTP Endpoints
//!
//! Chat bridge surface: one `ask` call per incoming chat message, and a
//! delete call to end a conversation.

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use storyvoice_agent::Bridge;

use crate::ServerError;

/// Create the bridge router
pub fn create_router(bridge: Arc<Bridge>) -> Router {
    Router::new()
        .route("/api/bridge/ask", post(ask))
        .route("/api/bridge/sessions/:source", delete(end_session))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(bridge)
}

/// Message from a chat conversation
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Conversation key, e.g. a chat room or user id
    pub source: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub reply: String,
}

async fn ask(
    State(bridge): State<Arc<Bridge>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ServerError> {
    if request.source.trim().is_empty() {
        return Err(ServerError::InvalidRequest("source must not be empty".to_string()));
    }
    tracing::debug!(source = %request.source, "Bridge message");

    let reply = bridge.ask(&request.source, &request.text).await?;
    Ok(Json(AskResponse { reply }))
}

async fn end_session(State(bridge): State<Arc<Bridge>>, Path(source): Path<String>) -> StatusCode {
    if bridge.remove(&source) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn health_check(State(bridge): State<Arc<Bridge>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "sessions": bridge.session_count(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
