use reqwest::{Client, StatusCode};

use crate::{
    config::SpotifyApp,
    error::RefreshError,
    types::{TokenErrorResponse, TokenResponse},
    utils,
};

/// Builds the URL the user opens to grant the application access.
///
/// # Arguments
///
/// * `auth_url` - Spotify authorize endpoint
/// * `app` - Registered application (client id, redirect URI and scope)
/// * `state` - Random value echoed back on the callback
///
/// # Example
///
/// ```
/// let url = authorize_url("https://accounts.spotify.com/authorize", &app, "xyz");
/// ```
pub fn authorize_url(auth_url: &str, app: &SpotifyApp, state: &str) -> String {
    format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&state={state}&scope={scope}",
        auth_url = auth_url,
        client_id = urlencoding::encode(&app.client_id),
        redirect_uri = urlencoding::encode(&app.redirect_uri),
        state = urlencoding::encode(state),
        scope = urlencoding::encode(&app.scope_param()),
    )
}

/// Runs the OAuth refresh-token grant once.
///
/// The application authenticates with HTTP Basic credentials. A `400` or
/// `401` answer means the refresh token (or the client) is no longer
/// accepted and is reported as [`RefreshError::Revoked`]; other non-success
/// answers become [`RefreshError::Rejected`] so that callers can decide
/// whether a retry makes sense.
///
/// # Arguments
///
/// * `http` - Shared HTTP client, already configured with a timeout
/// * `token_url` - Spotify token endpoint
/// * `app` - Registered application
/// * `refresh_token` - Long-lived refresh token
pub async fn refresh_access_token(
    http: &Client,
    token_url: &str,
    app: &SpotifyApp,
    refresh_token: &str,
) -> Result<TokenResponse, RefreshError> {
    request_token(
        http,
        token_url,
        app,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await
}

/// Exchanges the authorization code received on the callback for tokens.
///
/// Used once by `spotbot auth` to obtain the refresh token the server runs
/// with.
pub async fn exchange_code(
    http: &Client,
    token_url: &str,
    app: &SpotifyApp,
    code: &str,
) -> Result<TokenResponse, RefreshError> {
    request_token(
        http,
        token_url,
        app,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", app.redirect_uri.as_str()),
        ],
    )
    .await
}

async fn request_token(
    http: &Client,
    token_url: &str,
    app: &SpotifyApp,
    form: &[(&str, &str)],
) -> Result<TokenResponse, RefreshError> {
    let response = http
        .post(token_url)
        .header(
            "Authorization",
            utils::basic_auth(&app.client_id, &app.client_secret),
        )
        .form(form)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| RefreshError::Malformed(e.to_string()))?;
        if token.access_token.is_empty() {
            return Err(RefreshError::Malformed("empty access_token".to_string()));
        }
        return Ok(token);
    }

    if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
        let reason = match serde_json::from_str::<TokenErrorResponse>(&body) {
            Ok(err) => match err.error_description {
                Some(desc) => format!("{} ({})", err.error, desc),
                None => err.error,
            },
            Err(_) => body,
        };
        return Err(RefreshError::Revoked(reason));
    }

    Err(RefreshError::Rejected {
        status: status.as_u16(),
        body,
    })
}
