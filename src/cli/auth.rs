use std::{env, sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::{
    sync::{Mutex, oneshot},
    time::Instant,
};

use crate::{
    config::{self, DEFAULT_HTTP_TIMEOUT, ENV_REFRESH_TOKEN, Endpoints, SpotifyApp},
    error, info, server,
    spotify::{self, auth::authorize_url},
    success,
    types::PendingAuthorization,
    utils, warning,
};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// Obtains a refresh token through the authorization code flow.
///
/// A local server listens on the port of `SPOTIFY_API_REDIRECT_URI` while the
/// user grants access in the browser. The resulting refresh token is printed
/// and, with `save`, appended to the `.env` file in the local data
/// directory.
pub async fn auth(save: bool) {
    let lookup = |key: &str| env::var(key).ok();
    let app = match SpotifyApp::from_lookup(lookup) {
        Ok(app) => app,
        Err(e) => error!("Invalid configuration: {}", e),
    };
    let endpoints = Endpoints::from_lookup(lookup);

    let Some(port) = utils::redirect_port(&app.redirect_uri) else {
        error!("Cannot determine port of redirect URI {}", app.redirect_uri);
    };
    let path = utils::redirect_path(&app.redirect_uri);

    let state = utils::generate_state();
    let shared = Arc::new(Mutex::new(Some(PendingAuthorization {
        state: state.clone(),
        code: None,
    })));

    let (stop, stopped) = oneshot::channel();
    let server_state = Arc::clone(&shared);
    let addr = format!("127.0.0.1:{}", port);
    tokio::spawn(async move {
        if let Err(e) = server::start_callback_server(server_state, addr, path, stopped).await {
            warning!("Callback server failed: {}", e);
        }
    });

    let url = authorize_url(&endpoints.auth_url, &app, &state);
    if webbrowser::open(&url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            url
        );
    }

    let code = wait_for_code(&shared).await;
    let _ = stop.send(());

    let code = match code {
        Some(Ok(code)) => code,
        Some(Err(reason)) => error!("Authorization denied: {}", reason),
        None => error!("Authorization timed out."),
    };

    let http = match spotify::http_client(DEFAULT_HTTP_TIMEOUT) {
        Ok(http) => http,
        Err(e) => error!("Cannot build HTTP client: {}", e),
    };
    let token = match spotify::auth::exchange_code(&http, &endpoints.token_url, &app, &code).await
    {
        Ok(token) => token,
        Err(e) => error!("Token exchange failed: {}", e),
    };
    let Some(refresh_token) = token.refresh_token.filter(|t| !t.is_empty()) else {
        error!("Spotify did not return a refresh token");
    };

    success!("Authentication successful!");
    println!("{}={}", ENV_REFRESH_TOKEN, refresh_token);

    if save {
        match save_refresh_token(&refresh_token).await {
            Ok(()) => info!("Saved to {}", config::env_file_path().display()),
            Err(e) => error!("Failed to save refresh token: {}", e),
        }
    }
}

async fn wait_for_code(
    shared: &Arc<Mutex<Option<PendingAuthorization>>>,
) -> Option<Result<String, String>> {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for authorization in the browser...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let start = Instant::now();
    while start.elapsed() < CALLBACK_TIMEOUT {
        let code = shared
            .lock()
            .await
            .as_mut()
            .and_then(|pending| pending.code.take());
        if code.is_some() {
            pb.finish_and_clear();
            return code;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    pb.finish_and_clear();
    None
}

async fn save_refresh_token(refresh_token: &str) -> std::io::Result<()> {
    config::save_env_var(&config::env_file_path(), ENV_REFRESH_TOKEN, refresh_token).await
}
