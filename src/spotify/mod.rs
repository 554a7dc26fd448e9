//! # Spotify Integration Module
//!
//! Thin client for the Spotify Web API. [`SpotifyClient`] owns the HTTP
//! plumbing: it asks the [`TokenManager`] for a valid access token before
//! every call, applies the bounded retry rules and turns non-success answers
//! into [`ApiError::Upstream`]. The submodules map one resource family each
//! onto that client and return the upstream JSON untouched.
//!
//! ```text
//! api handlers
//!      ↓
//! library / catalog / playlists / follow / tracks
//!      ↓
//! SpotifyClient ── TokenManager ── auth (token endpoint)
//!      ↓
//! Spotify Web API
//! ```
//!
//! ## Retry rules
//!
//! - `429 Too Many Requests` is retried when `Retry-After` is at most
//!   [`MAX_RETRY_AFTER`] seconds.
//! - `502 Bad Gateway` is retried after one second.
//! - At most [`MAX_RETRIES`] retries per call; everything else is returned
//!   to the caller as is.

pub mod auth;
pub mod catalog;
pub mod follow;
pub mod library;
pub mod playlists;
pub mod tracks;

use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::time::sleep;

use crate::{
    error::{ApiError, ApiResult},
    management::TokenManager,
    warning,
};

pub const MAX_RETRIES: u32 = 2;
pub const MAX_RETRY_AFTER: u64 = 5;

/// Query string pairs sent along with a request.
pub type Params<'a> = Vec<(&'a str, String)>;

/// `limit`/`offset` pair of the paged listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub limit: u32,
    pub offset: u32,
}

impl Paging {
    pub fn params(&self) -> Params<'static> {
        vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ]
    }
}

#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Arc<TokenManager>,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: impl Into<String>, tokens: Arc<TokenManager>) -> Self {
        SpotifyClient {
            http,
            api_url: api_url.into(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Value> {
        self.request::<()>(Method::GET, path, query, None).await
    }

    pub async fn get_as<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let value = self.get(path, query).await?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::Upstream(format!("unexpected Spotify response: {}", e)))
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<Value> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put<B: Serialize>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> ApiResult<Value> {
        self.request(Method::PUT, path, query, body).await
    }

    pub async fn delete<B: Serialize>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> ApiResult<Value> {
        self.request(Method::DELETE, path, query, body).await
    }

    async fn request<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> ApiResult<Value> {
        let url = format!("{}{}", self.api_url, path);
        let mut retries = 0;

        loop {
            let token = self.tokens.current_token().await?;
            let mut request = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(&token.access_token)
                .query(query);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();

            if retries < MAX_RETRIES {
                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.trim().parse::<u64>().ok())
                        .unwrap_or(1);
                    if retry_after <= MAX_RETRY_AFTER {
                        warning!("Rate limited on {} {}, retrying in {}s", method, path, retry_after);
                        sleep(Duration::from_secs(retry_after)).await;
                        retries += 1;
                        continue;
                    }
                } else if status == StatusCode::BAD_GATEWAY {
                    sleep(Duration::from_secs(1)).await;
                    retries += 1;
                    continue; // retry
                }
            }

            let text = response.text().await?;
            if !status.is_success() {
                return Err(ApiError::Upstream(upstream_message(status, &text)));
            }
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text)
                .map_err(|e| ApiError::Upstream(format!("invalid JSON from Spotify: {}", e)));
        }
    }
}

/// HTTP client shared by every outbound call, bounded by `timeout`.
pub fn http_client(timeout: Duration) -> ApiResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ApiError::from)
}

/// Percent-encodes an id before it is placed in a request path.
pub fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

fn upstream_message(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.pointer("/error/message")
            .or_else(|| v.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    format!(
        "Spotify API error {}: {}",
        status.as_u16(),
        message.unwrap_or_else(|| body.trim().to_string())
    )
}
