use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{api::AppState, error::ApiError, utils};

/// Gate in front of every protected route.
///
/// The credential taken from the `Authorization` header must equal the
/// configured static API token byte for byte. Otherwise the request ends
/// here with `401` and the handler is never called.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(utils::extract_bearer)
        .is_some_and(|token| token.as_bytes() == state.api_token().as_bytes());

    if !authorized {
        return Err(ApiError::Unauthorized("Unauthorized".to_string()));
    }

    Ok(next.run(request).await)
}
