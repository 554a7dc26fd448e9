use std::time::Duration;

use reqwest::Client;

use crate::{
    error::{ApiError, ApiResult},
    types::{Lyrics, LyricsOvhResponse},
    utils,
};

pub const LYRICS_TIMEOUT: Duration = Duration::from_secs(5);

const NO_LYRICS_FOUND: &str = "No lyrics found";

/// Client for the lyrics.ovh API.
#[derive(Clone)]
pub struct LyricsClient {
    http: Client,
    base_url: String,
}

impl LyricsClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        LyricsClient {
            http,
            base_url: base_url.into(),
        }
    }

    /// Looks up the lyrics of one song.
    ///
    /// lyrics.ovh answers `{"error": "No lyrics found"}` for unknown songs,
    /// which is reported as [`ApiError::NotFound`]. Blank-line pairs are
    /// collapsed to single newlines.
    pub async fn lookup(&self, artist: &str, track: &str) -> ApiResult<Lyrics> {
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(track)
        );

        let response = self
            .http
            .get(&url)
            .timeout(LYRICS_TIMEOUT)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("lyrics lookup failed: {}", e)))?;
        let body: LyricsOvhResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(format!("lyrics lookup failed: {}", e)))?;

        if body.error.as_deref() == Some(NO_LYRICS_FOUND) {
            return Err(ApiError::not_found("Lyrics not found"));
        }

        match body.lyrics {
            Some(lyrics) => Ok(Lyrics {
                artist: artist.to_string(),
                track: track.to_string(),
                lyrics: utils::collapse_blank_lines(&lyrics),
            }),
            None => Err(ApiError::Upstream(format!(
                "lyrics lookup failed: {}",
                body.error.unwrap_or_else(|| "missing lyrics field".to_string())
            ))),
        }
    }
}
