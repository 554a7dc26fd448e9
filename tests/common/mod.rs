#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Form, Json, Router,
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::{HeaderMap, Method, Request, StatusCode, Uri, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use spotbot::{
    api::{self, AppState},
    config::Config,
    lyrics::LyricsClient,
    management::TokenManager,
    spotify::{self, SpotifyClient},
};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const API_TOKEN: &str = "test-api-token";
pub const REFRESH_TOKEN: &str = "initial-refresh-token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMode {
    Ok,
    Revoked,
    ServerError,
}

/// What the fake Spotify saw.
pub struct MockState {
    pub token_mode: Mutex<TokenMode>,
    pub token_delay: Mutex<Duration>,
    pub token_hits: AtomicUsize,
    pub api_hits: AtomicUsize,
    pub lyrics_hits: AtomicUsize,
    pub flaky_hits: AtomicUsize,
    pub gateway_hits: AtomicUsize,
    pub queries: Mutex<Vec<String>>,
    pub refresh_tokens_seen: Mutex<Vec<String>>,
    pub basic_auth_seen: Mutex<Vec<String>>,
    pub added: Mutex<Vec<Value>>,
}

impl MockState {
    pub fn token_hits(&self) -> usize {
        self.token_hits.load(Ordering::SeqCst)
    }

    pub fn api_hits(&self) -> usize {
        self.api_hits.load(Ordering::SeqCst)
    }

    pub fn set_token_mode(&self, mode: TokenMode) {
        *self.token_mode.lock().unwrap() = mode;
    }

    pub fn set_token_delay(&self, delay: Duration) {
        *self.token_delay.lock().unwrap() = delay;
    }
}

/// Fake Spotify accounts service, Web API and lyrics.ovh on one listener.
pub struct MockSpotify {
    pub base: String,
    pub state: Arc<MockState>,
}

impl MockSpotify {
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            token_mode: Mutex::new(TokenMode::Ok),
            token_delay: Mutex::new(Duration::ZERO),
            token_hits: AtomicUsize::new(0),
            api_hits: AtomicUsize::new(0),
            lyrics_hits: AtomicUsize::new(0),
            flaky_hits: AtomicUsize::new(0),
            gateway_hits: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            refresh_tokens_seen: Mutex::new(Vec::new()),
            basic_auth_seen: Mutex::new(Vec::new()),
            added: Mutex::new(Vec::new()),
        });

        let router = Router::new()
            .route("/api/token", post(token))
            .route("/v1/me", get(me))
            .route("/v1/search", get(search))
            .route("/v1/users/{user_id}/playlists", post(create_playlist))
            .route("/v1/playlists/{id}/tracks", post(add_tracks).fallback(echo))
            .route("/v1/artists/flaky", get(flaky))
            .route("/v1/artists/gateway", get(gateway))
            .route("/lyrics/{artist}/{track}", get(lyrics))
            .fallback(echo)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        MockSpotify { base, state }
    }

    pub fn config(&self) -> Config {
        let env = HashMap::from([
            ("SPOTIFY_API_AUTH_CLIENT_ID", "client-id".to_string()),
            ("SPOTIFY_API_AUTH_CLIENT_SECRET", "client-secret".to_string()),
            (
                "SPOTIFY_API_REDIRECT_URI",
                "http://127.0.0.1:8888/callback".to_string(),
            ),
            ("SPOTIFY_API_AUTH_SCOPE", "user-top-read".to_string()),
            ("SPOTIFY_API_REFRESH_TOKEN", REFRESH_TOKEN.to_string()),
            ("SPOTBOT_API_TOKEN", API_TOKEN.to_string()),
            ("SPOTIFY_API_URL", format!("{}/v1", self.base)),
            ("SPOTIFY_API_TOKEN_URL", format!("{}/api/token", self.base)),
            ("LYRICS_API_URL", format!("{}/lyrics", self.base)),
            ("HTTP_TIMEOUT_SECS", "5".to_string()),
        ]);
        Config::from_lookup(|key| env.get(key).cloned()).unwrap()
    }

    pub fn token_manager(&self) -> TokenManager {
        let config = self.config();
        TokenManager::from_config(&config, spotify::http_client(config.http_timeout).unwrap())
    }

    /// Router backed by this mock, after the initial token refresh.
    pub async fn app(&self) -> axum::Router {
        let config = self.config();
        let http = spotify::http_client(config.http_timeout).unwrap();
        let tokens = Arc::new(TokenManager::start(&config, http.clone()).await.unwrap());
        let spotify = SpotifyClient::new(http.clone(), config.endpoints.api_url.clone(), tokens);
        let lyrics = LyricsClient::new(http, config.endpoints.lyrics_url.clone());

        api::router(AppState::new(config, spotify, lyrics))
    }
}

/// Sends one request through the router and decodes the JSON body.
///
/// Bodies that are not JSON come back as a JSON string.
pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        request = request.header(AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    (status, value)
}

pub fn bearer() -> String {
    format!("Bearer {}", API_TOKEN)
}

async fn token(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let n = state.token_hits.fetch_add(1, Ordering::SeqCst) + 1;
    if let Some(auth) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        state.basic_auth_seen.lock().unwrap().push(auth.to_string());
    }
    if let Some(refresh_token) = form.get("refresh_token") {
        state
            .refresh_tokens_seen
            .lock()
            .unwrap()
            .push(refresh_token.clone());
    }

    let delay = *state.token_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let mode = *state.token_mode.lock().unwrap();
    match mode {
        TokenMode::Ok => Json(json!({
            "access_token": format!("token-{}", n),
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": format!("rotated-{}", n),
        }))
        .into_response(),
        TokenMode::Revoked => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Refresh token revoked" })),
        )
            .into_response(),
        TokenMode::ServerError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response()
        }
    }
}

async fn me(State(state): State<Arc<MockState>>) -> Json<Value> {
    state.api_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "id": "user-1", "display_name": "Test User" }))
}

async fn search(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.api_hits.fetch_add(1, Ordering::SeqCst);
    let q = params.get("q").cloned().unwrap_or_default();
    state.queries.lock().unwrap().push(q.clone());
    let name = q
        .strip_prefix("track:\"")
        .and_then(|rest| rest.split('"').next())
        .unwrap_or_default()
        .to_string();

    if name.is_empty() || name.starts_with("Missing") {
        return Json(json!({ "tracks": { "items": [] } }));
    }

    let id = name.replace(' ', "_");
    Json(json!({
        "tracks": {
            "items": [{ "id": id, "name": name, "uri": format!("spotify:track:{}", id) }]
        }
    }))
}

async fn create_playlist(
    State(state): State<Arc<MockState>>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.api_hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::CREATED,
        Json(json!({
            "id": "pl-new",
            "name": body["name"],
            "public": body["public"],
            "description": body["description"],
            "owner": { "id": user_id },
            "external_urls": { "spotify": "https://open.spotify.com/playlist/pl-new" },
        })),
    )
}

async fn add_tracks(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.api_hits.fetch_add(1, Ordering::SeqCst);
    state.added.lock().unwrap().push(body);
    (StatusCode::CREATED, Json(json!({ "snapshot_id": "snap-1" })))
}

async fn flaky(State(state): State<Arc<MockState>>) -> Response {
    state.api_hits.fetch_add(1, Ordering::SeqCst);
    if state.flaky_hits.fetch_add(1, Ordering::SeqCst) == 0 {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [("retry-after", "0")],
            "slow down",
        )
            .into_response();
    }
    Json(json!({ "id": "flaky", "name": "Flaky Artist" })).into_response()
}

async fn gateway(State(state): State<Arc<MockState>>) -> Response {
    state.api_hits.fetch_add(1, Ordering::SeqCst);
    if state.gateway_hits.fetch_add(1, Ordering::SeqCst) == 0 {
        return (StatusCode::BAD_GATEWAY, "bad gateway").into_response();
    }
    Json(json!({ "id": "gateway", "name": "Gateway Artist" })).into_response()
}

async fn lyrics(
    State(state): State<Arc<MockState>>,
    Path((artist, track)): Path<(String, String)>,
) -> Response {
    state.lyrics_hits.fetch_add(1, Ordering::SeqCst);
    if artist == "Nobody" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No lyrics found" })),
        )
            .into_response();
    }
    Json(json!({ "lyrics": format!("{} by {}\n\nSecond line\nThird line", track, artist) }))
        .into_response()
}

/// Reflects the request so tests can check what reached Spotify.
async fn echo(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    state.api_hits.fetch_add(1, Ordering::SeqCst);
    if uri.path().ends_with("/broken") {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "status": 404, "message": "Resource not found" } })),
        )
            .into_response();
    }

    let body = serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null);
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": params,
        "body": body,
        "authorization": headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default(),
    }))
    .into_response()
}
