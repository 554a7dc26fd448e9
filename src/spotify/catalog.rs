use serde_json::Value;

use crate::{
    error::ApiResult,
    spotify::{Paging, SpotifyClient, segment},
};

pub async fn search(
    client: &SpotifyClient,
    q: &str,
    search_type: &str,
    paging: Paging,
) -> ApiResult<Value> {
    let mut query = vec![("q", q.to_string()), ("type", search_type.to_string())];
    query.extend(paging.params());
    client.get("/search", &query).await
}

/// Recommendations with every seed/tunable parameter passed through.
pub async fn recommendations(
    client: &SpotifyClient,
    limit: u32,
    params: &[(String, String)],
) -> ApiResult<Value> {
    let mut query: Vec<(&str, String)> = vec![("limit", limit.to_string())];
    query.extend(params.iter().map(|(k, v)| (k.as_str(), v.clone())));
    client.get("/recommendations", &query).await
}

pub async fn artist(client: &SpotifyClient, artist_id: &str) -> ApiResult<Value> {
    client
        .get(&format!("/artists/{}", segment(artist_id)), &[])
        .await
}

pub async fn artist_top_tracks(
    client: &SpotifyClient,
    artist_id: &str,
    market: &str,
) -> ApiResult<Value> {
    client
        .get(
            &format!("/artists/{}/top-tracks", segment(artist_id)),
            &[("market", market.to_string())],
        )
        .await
}

pub async fn audio_features(client: &SpotifyClient, track_id: &str) -> ApiResult<Value> {
    client
        .get(&format!("/audio-features/{}", segment(track_id)), &[])
        .await
}

pub async fn audio_analysis(client: &SpotifyClient, track_id: &str) -> ApiResult<Value> {
    client
        .get(&format!("/audio-analysis/{}", segment(track_id)), &[])
        .await
}
