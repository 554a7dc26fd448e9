use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{types::PendingAuthorization, warning};

/// Receives the redirect from Spotify's authorize page during `spotbot auth`.
///
/// The `state` query value has to match the one generated for this attempt;
/// the authorization code (or the error Spotify sent) is stored for the
/// waiting command to pick up.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<PendingAuthorization>>>>,
) -> Html<&'static str> {
    let mut lock = shared_state.lock().await;
    let Some(pending) = lock.as_mut() else {
        return Html("<h4>No authorization in progress.</h4>");
    };

    if params.get("state").map(String::as_str) != Some(pending.state.as_str()) {
        warning!("Ignoring callback with mismatching state");
        return Html("<h4>State mismatch.</h4>");
    }

    if let Some(error) = params.get("error") {
        pending.code = Some(Err(error.clone()));
        return Html("<h4>Login failed.</h4>");
    }

    match params.get("code") {
        Some(code) => {
            pending.code = Some(Ok(code.clone()));
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        None => Html("<h4>Missing authorization code.</h4>"),
    }
}
