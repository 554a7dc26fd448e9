use std::collections::BTreeSet;

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};

/// Random `state` value for the authorization-code flow.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Value of the `Authorization: Basic` header for the token endpoint.
pub fn basic_auth(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", client_id, client_secret))
    )
}

/// Pulls the caller's credential out of an `Authorization` header value.
///
/// With the `Bearer ` scheme the last whitespace separated token is taken.
/// Without it the whole header is used as is, so a bare token works too.
pub fn extract_bearer(header: &str) -> &str {
    if header.starts_with("Bearer ") {
        header.split_whitespace().last().unwrap_or_default()
    } else {
        header
    }
}

/// Splits a scope setting on spaces and commas.
pub fn parse_scope(raw: &str) -> BTreeSet<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Search query used to resolve a free-text track name.
pub fn track_query(name: &str, artist: Option<&str>) -> String {
    let mut query = format!("track:\"{}\"", name);
    if let Some(artist) = artist.filter(|a| !a.is_empty()) {
        query.push_str(&format!(" artist:\"{}\"", artist));
    }
    query
}

/// Keeps the first and last two characters of a secret for display.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 6 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 4), tail)
}

pub fn collapse_blank_lines(text: &str) -> String {
    text.replace("\n\n", "\n")
}

/// Port of a redirect URI such as `http://127.0.0.1:8888/callback`.
pub fn redirect_port(redirect_uri: &str) -> Option<u16> {
    let url = reqwest::Url::parse(redirect_uri).ok()?;
    url.port_or_known_default()
}

/// Path of a redirect URI, `/` when it has none.
pub fn redirect_path(redirect_uri: &str) -> String {
    reqwest::Url::parse(redirect_uri)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| "/".to_string())
}

/// Sets `key=value` in the text of a `.env` file.
///
/// The first assignment of `key` is replaced in place and any later ones are
/// dropped, since dotenv keeps the first value it reads. Without an existing
/// assignment the line is appended. Every other line is kept.
pub fn upsert_env_line(contents: &str, key: &str, value: &str) -> String {
    let assignment = format!("{}={}", key, value);
    let mut replaced = false;
    let mut lines = Vec::new();

    for line in contents.lines() {
        if !assigns_key(line, key) {
            lines.push(line.to_string());
        } else if !replaced {
            lines.push(assignment.clone());
            replaced = true;
        }
    }
    if !replaced {
        lines.push(assignment);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn assigns_key(line: &str, key: &str) -> bool {
    let line = line.trim_start();
    let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
    line.strip_prefix(key)
        .is_some_and(|rest| rest.trim_start().starts_with('='))
}
