use crate::{
    error::{ApiError, ApiResult},
    spotify::{SpotifyClient, playlists},
    types::{SearchTracksResponse, Track},
    utils,
};

/// First search hit for a free-text track name, optionally narrowed to one
/// artist.
pub async fn search_first_track(
    client: &SpotifyClient,
    name: &str,
    artist: Option<&str>,
) -> ApiResult<Option<Track>> {
    let query = utils::track_query(name, artist);
    let response: SearchTracksResponse = client
        .get_as(
            "/search",
            &[
                ("q", query),
                ("type", "track".to_string()),
                ("limit", "1".to_string()),
            ],
        )
        .await?;

    Ok(response.tracks.and_then(|page| page.items.into_iter().next()))
}

/// Resolves every name to a track URI.
///
/// One search per name; the first hit wins. A single name without any hit
/// fails the whole batch with [`ApiError::NotFound`].
pub async fn resolve_track_uris(
    client: &SpotifyClient,
    names: &[String],
    artist: Option<&str>,
) -> ApiResult<Vec<String>> {
    let mut uris = Vec::with_capacity(names.len());

    for name in names {
        match search_first_track(client, name, artist).await? {
            Some(track) => uris.push(track.uri),
            None => {
                let by = artist
                    .filter(|a| !a.is_empty())
                    .map(|a| format!(" by {}", a))
                    .unwrap_or_default();
                return Err(ApiError::not_found(format!(
                    "No track found for '{}'{}",
                    name, by
                )));
            }
        }
    }

    Ok(uris)
}

/// Resolves the names and adds the tracks to a playlist.
///
/// Nothing is added unless every name resolved.
pub async fn add_tracks_by_name(
    client: &SpotifyClient,
    playlist_id: &str,
    names: &[String],
    artist: Option<&str>,
) -> ApiResult<Vec<String>> {
    let uris = resolve_track_uris(client, names, artist).await?;
    playlists::add_items(client, playlist_id, &uris, None).await?;
    Ok(uris)
}
