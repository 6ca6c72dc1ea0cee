use async_trait::async_trait;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request, State};
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use tracing::{debug, error};

use crate::AppState;
use crate::error::AppError;
use crate::models::{ChatRequest, ChatResponse, UsageStats};
use crate::relay;

// placeholder numbers, nothing is actually counted
pub const USAGE_STATS: UsageStats = UsageStats {
    daily_requests: 120,
    monthly_requests: 1450,
    token_usage: 356000,
    estimated_cost: "$7.12"
};

/// Chat body extractor.
///
/// A request that is not JSON, or has an empty body, reads as an empty
/// `ChatRequest` and so fails the user input check. Unparsable JSON is a 400
/// with the parser's message.
pub struct ChatBody(pub ChatRequest);

#[async_trait]
impl<S> FromRequest<S> for ChatBody
where
    S: Send + Sync
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {

        let is_json = is_json_content(request.headers());

        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ChatBody(ChatRequest::default()));
        }

        let body: ChatRequest = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;

        Ok(ChatBody(body))

    }
}

fn is_json_content(headers: &HeaderMap) -> bool {

    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let essence = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
            essence == "application/json" || essence.ends_with("+json")
        })
        .unwrap_or(false)

}

pub async fn chat_handler(
    State(state): State<AppState>,
    ChatBody(request): ChatBody
) -> Result<Json<ChatResponse>, AppError> {

    let user_input = relay::require_user_input(&request)?;
    let completion_request = relay::build_completion_request(&request, user_input);

    if state.config.validate_generation_params {
        relay::validate_generation_params(&completion_request)?;
    }

    debug!(
        model = %completion_request.model,
        history = completion_request.history_len(),
        "forwarding chat request"
    );

    let completion = state.completions
        .complete(completion_request)
        .await
        .map_err(|e| {
            error!(error = %e, "error calling completion provider");
            AppError::from(e)
        })?;

    Ok(Json(ChatResponse {
        response: completion.text,
        usage: completion.usage
    }))

}

pub async fn usage_handler() -> Json<UsageStats> {

    Json(USAGE_STATS)

}
