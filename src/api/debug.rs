use axum::{Json, extract::State};

use crate::{
    api::AppState,
    error::ApiResult,
    types::{DebugInfo, TokenStatus},
};

/// Credential and token introspection for operators.
pub async fn debug(State(state): State<AppState>) -> ApiResult<Json<DebugInfo>> {
    let token = state.tokens().current_token().await?;
    let app = &state.config.credentials.app;

    Ok(Json(DebugInfo {
        client_id: app.client_id.clone(),
        redirect_uri: app.redirect_uri.clone(),
        scope: app.scope_param(),
        token_expired: token.is_expired(),
        access_token: token.access_token,
    }))
}

/// Reports the token, refreshing it first when it has expired.
pub async fn validate_token(State(state): State<AppState>) -> ApiResult<Json<TokenStatus>> {
    let token = state.tokens().current_token().await?;

    Ok(Json(TokenStatus {
        token_expired: token.is_expired(),
        access_token: token.access_token,
    }))
}
