use serde_json::{Value, json};

use crate::{
    error::{ApiError, ApiResult},
    spotify::{Paging, SpotifyClient, segment},
    types::{
        AddTrackToPlaylistRequest, ChangePlaylistRequest, CreatePlaylistRequest,
        RemoveItemsRequest, ReorderItemsRequest,
    },
};

/// Spotify accepts at most this many URIs per add request.
pub const ADD_ITEMS_CHUNK: usize = 100;

pub async fn current_user_playlists(client: &SpotifyClient, paging: Paging) -> ApiResult<Value> {
    client.get("/me/playlists", &paging.params()).await
}

pub async fn user_playlists(
    client: &SpotifyClient,
    user_id: &str,
    paging: Paging,
) -> ApiResult<Value> {
    client
        .get(
            &format!("/users/{}/playlists", segment(user_id)),
            &paging.params(),
        )
        .await
}

pub async fn create(
    client: &SpotifyClient,
    user_id: &str,
    request: &CreatePlaylistRequest,
) -> ApiResult<Value> {
    client
        .post(&format!("/users/{}/playlists", segment(user_id)), request)
        .await
}

pub async fn get(client: &SpotifyClient, playlist_id: &str) -> ApiResult<Value> {
    client
        .get(&format!("/playlists/{}", segment(playlist_id)), &[])
        .await
}

pub async fn change_details(
    client: &SpotifyClient,
    playlist_id: &str,
    request: &ChangePlaylistRequest,
) -> ApiResult<Value> {
    client
        .put(
            &format!("/playlists/{}", segment(playlist_id)),
            &[],
            Some(request),
        )
        .await
}

pub async fn items(client: &SpotifyClient, playlist_id: &str, paging: Paging) -> ApiResult<Value> {
    client
        .get(
            &format!("/playlists/{}/tracks", segment(playlist_id)),
            &paging.params(),
        )
        .await
}

/// Adds URIs in chunks of [`ADD_ITEMS_CHUNK`].
///
/// With a `position` every chunk is inserted right after the previous one so
/// the given order is kept. Returns the answer of the last request, which
/// carries the final `snapshot_id`.
pub async fn add_items(
    client: &SpotifyClient,
    playlist_id: &str,
    uris: &[String],
    position: Option<u32>,
) -> ApiResult<Value> {
    let path = format!("/playlists/{}/tracks", segment(playlist_id));
    let requests = uris
        .chunks(ADD_ITEMS_CHUNK)
        .enumerate()
        .map(|(i, chunk)| -> ApiResult<AddTrackToPlaylistRequest> {
            Ok(AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
                position: position.map(|p| chunk_position(p, i)).transpose()?,
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    // offsets are checked up front so a bad position sends nothing
    let mut last = Value::Null;
    for request in &requests {
        last = client.post(&path, request).await?;
    }

    Ok(last)
}

fn chunk_position(position: u32, chunk: usize) -> ApiResult<u32> {
    chunk
        .checked_mul(ADD_ITEMS_CHUNK)
        .and_then(|offset| u32::try_from(offset).ok())
        .and_then(|offset| position.checked_add(offset))
        .ok_or_else(|| ApiError::validation("position out of range"))
}

pub async fn remove_items(
    client: &SpotifyClient,
    playlist_id: &str,
    request: &RemoveItemsRequest,
) -> ApiResult<Value> {
    client
        .delete(
            &format!("/playlists/{}/tracks", segment(playlist_id)),
            &[],
            Some(request),
        )
        .await
}

pub async fn reorder_items(
    client: &SpotifyClient,
    playlist_id: &str,
    request: &ReorderItemsRequest,
) -> ApiResult<Value> {
    client
        .put(
            &format!("/playlists/{}/tracks", segment(playlist_id)),
            &[],
            Some(request),
        )
        .await
}

pub async fn follow(client: &SpotifyClient, playlist_id: &str, public: bool) -> ApiResult<Value> {
    client
        .put(
            &format!("/playlists/{}/followers", segment(playlist_id)),
            &[],
            Some(&json!({ "public": public })),
        )
        .await
}

pub async fn unfollow(client: &SpotifyClient, playlist_id: &str) -> ApiResult<Value> {
    client
        .delete::<()>(
            &format!("/playlists/{}/followers", segment(playlist_id)),
            &[],
            None,
        )
        .await
}
