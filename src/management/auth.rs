use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use chrono::{TimeDelta, Utc};
use reqwest::Client;
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config::{Config, SpotifyApp},
    error::RefreshError,
    spotify, success,
    types::TokenState,
    warning,
};

const MAX_REFRESH_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

struct Inner {
    token: Option<TokenState>,
    refresh_token: String,
}

/// Owns the Spotify access token and keeps it valid.
///
/// The token is refreshed lazily: the first caller that observes an expired
/// (or missing) token runs the refresh-token grant while holding the lock,
/// every concurrent caller waits for that result instead of issuing its own
/// refresh. A failed refresh never touches the stored token.
pub struct TokenManager {
    http: Client,
    token_url: String,
    app: SpotifyApp,
    inner: Mutex<Inner>,
    refreshes: AtomicU64,
}

impl TokenManager {
    pub fn new(
        http: Client,
        token_url: impl Into<String>,
        app: SpotifyApp,
        refresh_token: impl Into<String>,
    ) -> Self {
        TokenManager {
            http,
            token_url: token_url.into(),
            app,
            inner: Mutex::new(Inner {
                token: None,
                refresh_token: refresh_token.into(),
            }),
            refreshes: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &Config, http: Client) -> Self {
        Self::new(
            http,
            config.endpoints.token_url.clone(),
            config.credentials.app.clone(),
            config.credentials.refresh_token.clone(),
        )
    }

    /// Seeds the manager with an already known token.
    pub fn with_token(mut self, token: TokenState) -> Self {
        self.inner.get_mut().token = Some(token);
        self
    }

    /// Creates the manager and performs the initial refresh.
    ///
    /// Fails when Spotify does not hand out a token; the server must not
    /// start in that case.
    pub async fn start(config: &Config, http: Client) -> Result<Self, RefreshError> {
        let manager = Self::from_config(config, http);
        manager.refresh().await?;
        Ok(manager)
    }

    /// Returns a token that is valid at the instant of return.
    pub async fn current_token(&self) -> Result<TokenState, RefreshError> {
        let mut inner = self.inner.lock().await;
        if let Some(token) = inner.token.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.clone());
        }
        self.refresh_locked(&mut inner).await
    }

    /// Forces a refresh regardless of the current expiry.
    pub async fn refresh(&self) -> Result<TokenState, RefreshError> {
        let mut inner = self.inner.lock().await;
        self.refresh_locked(&mut inner).await
    }

    /// The stored token without triggering a refresh.
    pub async fn snapshot(&self) -> Option<TokenState> {
        self.inner.lock().await.token.clone()
    }

    /// Number of successful refreshes since the manager was created.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn app(&self) -> &SpotifyApp {
        &self.app
    }

    async fn refresh_locked(&self, inner: &mut Inner) -> Result<TokenState, RefreshError> {
        let mut attempt = 1;
        let mut delay = RETRY_BASE_DELAY;

        let response = loop {
            match spotify::auth::refresh_access_token(
                &self.http,
                &self.token_url,
                &self.app,
                &inner.refresh_token,
            )
            .await
            {
                Ok(response) => break response,
                Err(e) if e.is_transient() && attempt < MAX_REFRESH_ATTEMPTS => {
                    warning!(
                        "Token refresh attempt {}/{} failed, retrying in {:?}: {}",
                        attempt,
                        MAX_REFRESH_ATTEMPTS,
                        delay,
                        e
                    );
                    sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        let lifetime = TimeDelta::try_seconds(response.expires_in).ok_or_else(|| {
            RefreshError::Malformed(format!("expires_in out of range: {}", response.expires_in))
        })?;
        let state = TokenState {
            access_token: response.access_token,
            expires_at: Utc::now() + lifetime,
        };

        if let Some(rotated) = response.refresh_token.filter(|t| !t.is_empty()) {
            inner.refresh_token = rotated;
        }
        inner.token = Some(state.clone());
        self.refreshes.fetch_add(1, Ordering::SeqCst);

        success!(
            "Spotify access token refreshed, valid until {}",
            state.expires_at.to_rfc3339()
        );
        Ok(state)
    }
}
