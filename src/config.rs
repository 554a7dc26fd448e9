use std::{
    collections::BTreeSet,
    env, io,
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;

use crate::utils;

pub const ENV_CLIENT_ID: &str = "SPOTIFY_API_AUTH_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SPOTIFY_API_AUTH_CLIENT_SECRET";
pub const ENV_REDIRECT_URI: &str = "SPOTIFY_API_REDIRECT_URI";
pub const ENV_SCOPE: &str = "SPOTIFY_API_AUTH_SCOPE";
pub const ENV_REFRESH_TOKEN: &str = "SPOTIFY_API_REFRESH_TOKEN";
pub const ENV_API_TOKEN: &str = "SPOTBOT_API_TOKEN";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_LYRICS_API_URL: &str = "https://api.lyrics.ovh/v1";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Loads the `.env` files that feed the configuration.
///
/// The file in the local data directory (`<data_local_dir>/spotbot/.env`) is
/// read first, then `./.env`. Variables already present in the process
/// environment are never overwritten, so the real environment always wins.
pub async fn load_env() -> Result<(), String> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    load_env_file(&path)?;
    load_env_file(Path::new(".env"))
}

/// Loads one `.env` file into the process environment.
///
/// A missing file is skipped. A file that cannot be read or parsed is an
/// error naming the path.
pub fn load_env_file(path: &Path) -> Result<(), String> {
    match dotenv::from_path(path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(format!("{}: {}", path.display(), e)),
    }
}

/// Writes `key=value` into the `.env` file at `path`, replacing an earlier
/// assignment of the same key and keeping every other line.
pub async fn save_env_var(path: &Path, key: &str, value: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    let contents = match async_fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };
    async_fs::write(path, utils::upsert_env_line(&contents, key, value)).await
}

pub fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotbot/.env");
    path
}

/// The registered Spotify application used for the OAuth flows.
#[derive(Debug, Clone)]
pub struct SpotifyApp {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: BTreeSet<String>,
}

impl SpotifyApp {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let app = read_app(&lookup, &mut missing);
        if missing.is_empty() {
            Ok(app)
        } else {
            Err(ConfigError::Missing(missing))
        }
    }

    /// Scope in the space separated form the authorization server expects.
    pub fn scope_param(&self) -> String {
        self.scope.iter().cloned().collect::<Vec<_>>().join(" ")
    }
}

/// Everything needed to mint access tokens and to check inbound callers.
///
/// Immutable once the process has started.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub app: SpotifyApp,
    pub refresh_token: String,
    pub api_token: String,
}

/// Base URLs of every remote service the backend talks to.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub api_url: String,
    pub token_url: String,
    pub auth_url: String,
    pub lyrics_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            token_url: DEFAULT_SPOTIFY_TOKEN_URL.to_string(),
            auth_url: DEFAULT_SPOTIFY_AUTH_URL.to_string(),
            lyrics_url: DEFAULT_LYRICS_API_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let pick = |key: &str, fallback: String| {
            non_empty(&lookup, key)
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(fallback)
        };

        Self {
            api_url: pick("SPOTIFY_API_URL", defaults.api_url),
            token_url: pick("SPOTIFY_API_TOKEN_URL", defaults.token_url),
            auth_url: pick("SPOTIFY_API_AUTH_URL", defaults.auth_url),
            lyrics_url: pick("LYRICS_API_URL", defaults.lyrics_url),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub host: String,
    pub port: u16,
    pub endpoints: Endpoints,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from a key lookup.
    ///
    /// All missing required keys are reported in one [`ConfigError::Missing`]
    /// so that a broken deployment can be fixed in a single pass.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let app = read_app(&lookup, &mut missing);
        let refresh_token = required(&lookup, ENV_REFRESH_TOKEN, &mut missing);
        let api_token = required(&lookup, ENV_API_TOKEN, &mut missing);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let host = non_empty(&lookup, "SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match non_empty(&lookup, "PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: format!("'{}': {}", raw, e),
            })?,
            None => DEFAULT_PORT,
        };
        let http_timeout = match non_empty(&lookup, "HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        key: "HTTP_TIMEOUT_SECS",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Ok(secs) => Duration::from_secs(secs),
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        key: "HTTP_TIMEOUT_SECS",
                        reason: format!("'{}': {}", raw, e),
                    });
                }
            },
            None => DEFAULT_HTTP_TIMEOUT,
        };

        Ok(Self {
            credentials: Credentials {
                app,
                refresh_token,
                api_token,
            },
            host,
            port,
            endpoints: Endpoints::from_lookup(&lookup),
            http_timeout,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn read_app<F>(lookup: &F, missing: &mut Vec<&'static str>) -> SpotifyApp
where
    F: Fn(&str) -> Option<String>,
{
    let client_id = required(lookup, ENV_CLIENT_ID, missing);
    let client_secret = required(lookup, ENV_CLIENT_SECRET, missing);
    let redirect_uri = required(lookup, ENV_REDIRECT_URI, missing);
    let scope = utils::parse_scope(&required(lookup, ENV_SCOPE, missing));
    if scope.is_empty() && !missing.contains(&ENV_SCOPE) {
        missing.push(ENV_SCOPE);
    }

    SpotifyApp {
        client_id,
        client_secret,
        redirect_uri,
        scope,
    }
}

fn required<F>(lookup: &F, key: &'static str, missing: &mut Vec<&'static str>) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key) {
        Some(value) => value,
        None => {
            missing.push(key);
            String::new()
        }
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
