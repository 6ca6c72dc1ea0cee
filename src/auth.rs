use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::AppState;
use crate::error::AppError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects any request whose `X-API-Key` is missing or differs from the configured client key.
///
/// Runs as a route layer, before the body is read.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next
) -> Result<Response, AppError> {

    let authorized = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|key| key == state.config.client_api_key);

    if !authorized {
        tracing::warn!(path = %request.uri().path(), "rejected request with missing or invalid api key");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)

}
