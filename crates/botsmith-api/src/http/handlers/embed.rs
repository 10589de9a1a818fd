//! Embedded chat session handlers.
//!
//! Endpoints:
//! - POST   /api/v1/embed/sessions               - Open a session from an embed token
//! - POST   /api/v1/embed/sessions/{id}/messages - Send a message, get the bot's reply
//! - GET    /api/v1/embed/sessions/{id}/messages - Conversation so far
//! - DELETE /api/v1/embed/sessions/{id}          - Close a session

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use botsmith_core::embed::codec::{token_from_url, try_decode};
use botsmith_types::bot::BotConfig;
use botsmith_types::chat::ChatMessage;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, new_request_id};
use crate::http::sessions::EmbedHost;

#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    /// Embed token, `#token`, or a full embed URL.
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

/// What the widget needs to render its header.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotSummary {
    pub id: String,
    pub name: String,
    pub theme_color: String,
}

impl From<&BotConfig> for BotSummary {
    fn from(bot: &BotConfig) -> Self {
        Self {
            id: bot.id.clone(),
            name: bot.name.clone(),
            theme_color: bot.theme_color.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OpenedSession {
    pub session_id: String,
    pub bot: BotSummary,
}

fn session_link(id: &str) -> String {
    format!("/api/v1/embed/sessions/{id}")
}

/// POST /api/v1/embed/sessions - Decode a token and open a session.
pub async fn open_session(
    State(host): State<EmbedHost>,
    Json(body): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OpenedSession>>), AppError> {
    let start = Instant::now();
    let bot = try_decode(token_from_url(&body.token))?;
    let summary = BotSummary::from(&bot);
    let session_id = host.open(bot);
    tracing::info!(session_id = %session_id, bot_id = %summary.id, "embed session opened");

    let link = session_link(&session_id);
    let resp = ApiResponse::success(
        OpenedSession {
            session_id,
            bot: summary,
        },
        new_request_id(),
        start.elapsed().as_millis() as u64,
    )
    .with_link("messages", &format!("{link}/messages"))
    .with_link("self", &link);

    Ok((StatusCode::CREATED, Json(resp)))
}

/// POST /api/v1/embed/sessions/{id}/messages - Run one chat turn.
pub async fn send_message(
    State(host): State<EmbedHost>,
    Path(session_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<ChatMessage>>, AppError> {
    let start = Instant::now();
    if body.text.trim().is_empty() {
        return Err(AppError::Validation("Message text cannot be empty".to_string()));
    }

    let session = host
        .get(&session_id)
        .ok_or_else(|| AppError::SessionNotFound(session_id.clone()))?;
    let mut session = session.lock().await;
    let session = &mut *session;
    session.touch();

    let reply = host
        .chat
        .send(&mut session.conversation, &session.bot, &session.knowledge, &body.text)
        .await
        .ok_or_else(|| AppError::Internal("the chat turn produced no reply".to_string()))?;

    Ok(Json(ApiResponse::success(
        reply,
        new_request_id(),
        start.elapsed().as_millis() as u64,
    )))
}

/// GET /api/v1/embed/sessions/{id}/messages - Conversation so far, oldest first.
pub async fn list_messages(
    State(host): State<EmbedHost>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let start = Instant::now();
    let session = host
        .get(&session_id)
        .ok_or_else(|| AppError::SessionNotFound(session_id.clone()))?;
    let messages = {
        let mut session = session.lock().await;
        session.touch();
        session.conversation.snapshot()
    };

    Ok(Json(
        ApiResponse::success(messages, new_request_id(), start.elapsed().as_millis() as u64)
            .with_link("self", &format!("{}/messages", session_link(&session_id))),
    ))
}

/// DELETE /api/v1/embed/sessions/{id} - Close a session.
pub async fn close_session(
    State(host): State<EmbedHost>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    if !host.close(&session_id) {
        return Err(AppError::SessionNotFound(session_id));
    }
    tracing::info!(session_id = %session_id, "embed session closed");

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": session_id }),
        new_request_id(),
        start.elapsed().as_millis() as u64,
    )))
}
