//! Older route shapes kept for existing clients.
//!
//! Each handler translates its request into the canonical form and hands it
//! to the same code the canonical route uses.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    api::{
        AppState, me,
        params::{QueryMap, parse_body},
        playlists,
    },
    error::{ApiError, ApiResult},
    types::{
        FromNamesBody, LegacyAddTracksBody, LegacyCreatePlaylistBody, LegacyRemoveTracksBody,
        NewPlaylistBody, RemoveItemsBody, TopItemType, TrackRef,
    },
};

pub async fn top_artists(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> ApiResult<Json<Value>> {
    me::top_items_of(&state, TopItemType::Artists, &params).await
}

pub async fn top_tracks(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> ApiResult<Json<Value>> {
    me::top_items_of(&state, TopItemType::Tracks, &params).await
}

pub async fn create_playlist(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let body = parse_body::<LegacyCreatePlaylistBody>(&body)?;
    if body.playlist_name.as_deref().is_none_or(|n| n.trim().is_empty()) {
        return Err(ApiError::validation("playlist_name is required"));
    }

    let created = playlists::create_for_current_user(
        &state,
        NewPlaylistBody {
            name: body.playlist_name,
            public: body.public,
            description: body.description,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Playlist created successfully",
            "playlist_id": created["id"],
            "playlist_url": created["external_urls"]["spotify"],
        })),
    ))
}

pub async fn remove_tracks(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let body = parse_body::<LegacyRemoveTracksBody>(&body)?;
    let tracks = body
        .track_uris
        .filter(|uris| !uris.is_empty())
        .ok_or_else(|| ApiError::validation("track_uris is required"))?
        .into_iter()
        .map(|uri| TrackRef {
            uri,
            positions: None,
        })
        .collect();

    playlists::remove(
        &state,
        &playlist_id,
        RemoveItemsBody {
            tracks: Some(tracks),
            snapshot_id: body.snapshot_id,
        },
    )
    .await
}

pub async fn reorder_tracks(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    playlists::reorder(&state, &playlist_id, parse_body(&body)?).await
}

pub async fn add_tracks_to_playlist(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let body = parse_body::<LegacyAddTracksBody>(&body)?;
    let playlist_id = body
        .playlist_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::validation("playlist_id is required"))?;

    playlists::add_by_names(
        &state,
        &playlist_id,
        FromNamesBody {
            track_names: body.track_names,
            artist_name: body.artist_name,
        },
    )
    .await
}
