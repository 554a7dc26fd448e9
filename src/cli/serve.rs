use std::sync::Arc;

use crate::{
    api::AppState,
    config::Config,
    error, info,
    lyrics::{LYRICS_TIMEOUT, LyricsClient},
    management::TokenManager,
    server,
    spotify::{self, SpotifyClient},
};

/// Starts the proxy server.
///
/// Configuration is read from the environment; `host` and `port` override
/// `SERVER_HOST` and `PORT`. The initial token refresh has to succeed before
/// the listener is opened.
pub async fn serve(host: Option<String>, port: Option<u16>) {
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    };
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let http = match spotify::http_client(config.http_timeout) {
        Ok(http) => http,
        Err(e) => error!("Cannot build HTTP client: {}", e),
    };
    let lyrics_http = match spotify::http_client(LYRICS_TIMEOUT) {
        Ok(http) => http,
        Err(e) => error!("Cannot build HTTP client: {}", e),
    };

    info!("Requesting initial Spotify access token");
    let tokens = match TokenManager::start(&config, http.clone()).await {
        Ok(tokens) => Arc::new(tokens),
        Err(e) => error!("Initial token refresh failed: {}", e),
    };

    let spotify = SpotifyClient::new(http, config.endpoints.api_url.clone(), tokens);
    let lyrics = LyricsClient::new(lyrics_http, config.endpoints.lyrics_url.clone());
    let addr = config.addr();
    let state = AppState::new(config, spotify, lyrics);

    if let Err(e) = server::start_api_server(state, &addr).await {
        error!("Server on {} failed: {}", addr, e);
    }
}
