use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::{debug, error, warn};

use harvest_chat::ChatError;
use harvest_types::api::{ChatRequest, ChatResponse};

use crate::AppState;

const EMPTY_MESSAGE: &str = "Please enter a message.";
const NOT_CONFIGURED: &str = "The chatbot is not configured.";
const UPSTREAM_FAILED: &str = "Sorry, I couldn't process that right now. Please try again later.";

/// POST /api/chat: relays `{message}` to the chatbot. Upstream details only
/// go to the log.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatResponse>) {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            debug!("Malformed chat request: {}", rejection);
            return (StatusCode::BAD_REQUEST, Json(ChatResponse::error(EMPTY_MESSAGE)));
        }
    };

    match state.chat.chat(&req.message).await {
        Ok(reply) => (StatusCode::OK, Json(ChatResponse::success(reply))),
        Err(ChatError::InvalidInput) => {
            (StatusCode::BAD_REQUEST, Json(ChatResponse::error(EMPTY_MESSAGE)))
        }
        Err(ChatError::ServiceUnavailable) => {
            warn!("Chat request received but no API key is configured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse::error(NOT_CONFIGURED)),
            )
        }
        Err(ChatError::UpstreamFailure(detail)) => {
            error!("Chatbot upstream failure: {}", detail);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse::error(UPSTREAM_FAILED)),
            )
        }
    }
}
