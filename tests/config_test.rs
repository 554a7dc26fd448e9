use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use spotbot::config::{
    Config, ConfigError, DEFAULT_HOST, DEFAULT_HTTP_TIMEOUT, DEFAULT_PORT, ENV_API_TOKEN,
    ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_REDIRECT_URI, ENV_REFRESH_TOKEN, ENV_SCOPE, Endpoints,
    SpotifyApp, load_env_file, save_env_var,
};

fn complete_env() -> HashMap<&'static str, String> {
    HashMap::from([
        (ENV_CLIENT_ID, "client".to_string()),
        (ENV_CLIENT_SECRET, "secret".to_string()),
        (ENV_REDIRECT_URI, "http://127.0.0.1:8888/callback".to_string()),
        (ENV_SCOPE, "user-top-read playlist-modify-public".to_string()),
        (ENV_REFRESH_TOKEN, "refresh".to_string()),
        (ENV_API_TOKEN, "api-token".to_string()),
    ])
}

fn load(env: &HashMap<&'static str, String>) -> Result<Config, ConfigError> {
    Config::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn test_complete_environment() {
    let config = load(&complete_env()).unwrap();

    assert_eq!(config.credentials.app.client_id, "client");
    assert_eq!(config.credentials.app.client_secret, "secret");
    assert_eq!(config.credentials.refresh_token, "refresh");
    assert_eq!(config.credentials.api_token, "api-token");
    assert_eq!(config.credentials.app.scope.len(), 2);

    assert_eq!(config.host, DEFAULT_HOST);
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.http_timeout, DEFAULT_HTTP_TIMEOUT);
    assert_eq!(config.addr(), "0.0.0.0:5000");
}

#[test]
fn test_missing_keys_are_reported_together() {
    let mut env = complete_env();
    env.remove(ENV_CLIENT_SECRET);
    env.remove(ENV_API_TOKEN);

    let err = load(&env).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Missing(vec![ENV_CLIENT_SECRET, ENV_API_TOKEN])
    );
}

#[test]
fn test_blank_values_count_as_missing() {
    let mut env = complete_env();
    env.insert(ENV_REFRESH_TOKEN, "   ".to_string());
    env.insert(ENV_SCOPE, " , ".to_string());

    let err = load(&env).unwrap_err();
    match err {
        ConfigError::Missing(keys) => {
            assert!(keys.contains(&ENV_REFRESH_TOKEN));
            assert!(keys.contains(&ENV_SCOPE));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_optional_overrides() {
    let mut env = complete_env();
    env.insert("SERVER_HOST", "127.0.0.1".to_string());
    env.insert("PORT", "8080".to_string());
    env.insert("HTTP_TIMEOUT_SECS", "3".to_string());
    env.insert("SPOTIFY_API_URL", "http://localhost:9000/v1/".to_string());

    let config = load(&env).unwrap();
    assert_eq!(config.addr(), "127.0.0.1:8080");
    assert_eq!(config.http_timeout, Duration::from_secs(3));

    // Trailing slash is trimmed
    assert_eq!(config.endpoints.api_url, "http://localhost:9000/v1");
}

#[test]
fn test_invalid_port() {
    let mut env = complete_env();
    env.insert("PORT", "seventy".to_string());

    match load(&env).unwrap_err() {
        ConfigError::Invalid { key, .. } => assert_eq!(key, "PORT"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_zero_timeout_is_invalid() {
    let mut env = complete_env();
    env.insert("HTTP_TIMEOUT_SECS", "0".to_string());

    match load(&env).unwrap_err() {
        ConfigError::Invalid { key, .. } => assert_eq!(key, "HTTP_TIMEOUT_SECS"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_endpoint_defaults() {
    let endpoints = Endpoints::from_lookup(|_| None);

    assert_eq!(endpoints.api_url, "https://api.spotify.com/v1");
    assert_eq!(endpoints.token_url, "https://accounts.spotify.com/api/token");
    assert_eq!(endpoints.auth_url, "https://accounts.spotify.com/authorize");
    assert_eq!(endpoints.lyrics_url, "https://api.lyrics.ovh/v1");
}

#[test]
fn test_app_without_refresh_token() {
    // `spotbot auth` only needs the application settings
    let mut env = complete_env();
    env.remove(ENV_REFRESH_TOKEN);
    env.remove(ENV_API_TOKEN);

    let app = SpotifyApp::from_lookup(|key| env.get(key).cloned()).unwrap();
    assert_eq!(app.scope_param(), "playlist-modify-public user-top-read");
}

fn scratch_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir()
        .join(format!("spotbot-test-{}", std::process::id()))
        .join(name);
    let _ = std::fs::remove_file(&path);
    path
}

fn read_env_file(path: &Path) -> HashMap<String, String> {
    dotenv::from_path_iter(path)
        .unwrap()
        .map(|item| item.unwrap())
        .collect()
}

#[tokio::test]
async fn test_saved_refresh_token_replaces_previous() {
    let path = scratch_file("resave.env");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, format!("{}=client\n{}=api-token\n", ENV_CLIENT_ID, ENV_API_TOKEN))
        .unwrap();

    save_env_var(&path, ENV_REFRESH_TOKEN, "old-revoked").await.unwrap();
    save_env_var(&path, ENV_REFRESH_TOKEN, "fresh-new").await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.matches(ENV_REFRESH_TOKEN).count(), 1);

    // What the server would load on the next start
    let vars = read_env_file(&path);
    assert_eq!(vars[ENV_REFRESH_TOKEN], "fresh-new");
    assert_eq!(vars[ENV_CLIENT_ID], "client");
    assert_eq!(vars[ENV_API_TOKEN], "api-token");
}

#[tokio::test]
async fn test_save_creates_missing_env_file() {
    let path = scratch_file("fresh/created.env");

    save_env_var(&path, ENV_REFRESH_TOKEN, "first").await.unwrap();

    assert_eq!(read_env_file(&path)[ENV_REFRESH_TOKEN], "first");
}

#[tokio::test]
async fn test_save_fails_on_unreadable_env_file() {
    // A directory in place of the file cannot be read, and must not be replaced
    let path = scratch_file("not-a-file.env");
    std::fs::create_dir_all(&path).unwrap();

    assert!(save_env_var(&path, ENV_REFRESH_TOKEN, "x").await.is_err());
    assert!(path.is_dir());
}

#[test]
fn test_missing_env_file_is_skipped() {
    assert!(load_env_file(&scratch_file("does-not-exist.env")).is_ok());
}

#[test]
fn test_malformed_env_file_is_reported() {
    let path = scratch_file("malformed.env");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "SPOTBOT_BROKEN LINE WITHOUT ASSIGNMENT\n").unwrap();

    let err = load_env_file(&path).unwrap_err();
    assert!(err.contains("malformed.env"));
}
