use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{SecondsFormat, Utc};
use ninni_llm_api::{LlmClient, LlmError};
use ninni_models::{ChatReply, ChatRequest, ErrorBody, HealthStatus};
use serde_json::Value;
use std::sync::Arc;

use crate::config::{AnonymousSessions, PersonaConfig};
use crate::web::session_manager::SessionManager;

const INDEX_HTML: &str = include_str!("../../web/index.html");

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub llm: Arc<dyn LlmClient>,
    pub persona: Arc<PersonaConfig>,
    pub anonymous_sessions: AnonymousSessions,
}

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .route("/", get(serve_index))
        .with_state(state)
}

/// POST /api/chat - Send one message and get the persona's reply
async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(%rejection, "Unreadable chat request body");
            Value::Null
        }
    };
    let request = parse_chat_request(body)?;

    let message = request
        .non_blank_message()
        .ok_or(AppError::MissingMessage)?
        .to_string();

    let (session_id, assigned) = state.anonymous_sessions.resolve(request.session_id);
    if assigned && state.anonymous_sessions == AnonymousSessions::Shared {
        tracing::warn!(
            session_id = %session_id,
            "Chat request without sessionId joined the shared conversation"
        );
    }

    let conversation = state.sessions.get_or_create(&session_id).await;
    let mut conversation = conversation.lock().await;

    let reply = conversation
        .exchange(state.llm.as_ref(), &state.persona, &message)
        .await
        .map_err(|source| {
            tracing::error!(
                session_id = %session_id,
                conversation = %conversation.id,
                conversation_started = %conversation.created_at,
                backend = %state.llm.backend(),
                remote = source.is_remote(),
                error = %source,
                "Generation failed"
            );
            AppError::Upstream {
                apology: state.persona.apology(),
                source,
            }
        })?;

    tracing::info!(
        session_id = %session_id,
        turns = conversation.turns().len(),
        "Replied to chat message"
    );

    Ok(Json(ChatReply {
        message: reply,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        session_id,
    }))
}

/// A body without a usable `message` is a missing message, whatever else it
/// holds; only then are the remaining fields checked.
fn parse_chat_request(body: Value) -> Result<ChatRequest, AppError> {
    let has_message = body
        .get("message")
        .and_then(Value::as_str)
        .is_some_and(|message| !message.trim().is_empty());
    if !has_message {
        return Err(AppError::MissingMessage);
    }

    serde_json::from_value(body).map_err(|err| AppError::InvalidRequest(err.to_string()))
}

/// GET /api/health - Liveness check
async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus::ok(state.persona.health_message()))
}

/// GET / - The chat page
async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Errors reported to HTTP clients as `{"error": ...}`
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Message is required")]
    MissingMessage,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{apology}")]
    Upstream {
        apology: String,
        #[source]
        source: LlmError,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingMessage | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
