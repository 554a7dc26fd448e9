use std::env;

use tabled::Table;

use crate::{
    config::{
        self, Config, ENV_API_TOKEN, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_REDIRECT_URI,
        ENV_REFRESH_TOKEN, ENV_SCOPE,
    },
    success,
    types::SettingTableRow,
    utils, warning,
};

const SECRET_KEYS: [&str; 3] = [ENV_CLIENT_SECRET, ENV_REFRESH_TOKEN, ENV_API_TOKEN];

const KEYS: [&str; 13] = [
    ENV_CLIENT_ID,
    ENV_CLIENT_SECRET,
    ENV_REDIRECT_URI,
    ENV_SCOPE,
    ENV_REFRESH_TOKEN,
    ENV_API_TOKEN,
    "SERVER_HOST",
    "PORT",
    "SPOTIFY_API_URL",
    "SPOTIFY_API_TOKEN_URL",
    "SPOTIFY_API_AUTH_URL",
    "LYRICS_API_URL",
    "HTTP_TIMEOUT_SECS",
];

/// Prints the effective settings with secrets masked, then validates them.
pub fn settings() {
    let rows: Vec<SettingTableRow> = KEYS
        .iter()
        .map(|key| {
            let value = match env::var(key).ok().filter(|v| !v.trim().is_empty()) {
                Some(v) if SECRET_KEYS.contains(key) => utils::mask_secret(&v),
                Some(v) => v,
                None => "(not set)".to_string(),
            };
            SettingTableRow {
                name: key.to_string(),
                value,
            }
        })
        .collect();

    println!("{}", Table::new(rows));
    println!("env file: {}", config::env_file_path().display());

    match Config::from_env() {
        Ok(config) => success!("Configuration is complete, server would listen on {}", config.addr()),
        Err(e) => warning!("Configuration is incomplete: {}", e),
    }
}
