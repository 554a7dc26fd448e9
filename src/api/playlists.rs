use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    api::{
        AppState,
        params::{DEFAULT_LIMIT, DEFAULT_PLAYLIST_ITEMS_LIMIT, QueryMap, paging, parse_body},
    },
    error::{ApiError, ApiResult},
    spotify::{library, playlists, tracks},
    types::{
        AddItemsBody, ChangePlaylistRequest, CreatePlaylistRequest, FollowPlaylistBody,
        FromNamesBody, NewPlaylistBody, RemoveItemsBody, RemoveItemsRequest, ReorderBody,
        ReorderItemsRequest,
    },
};

pub async fn my_playlists(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> ApiResult<Json<Value>> {
    let paging = paging(&params, DEFAULT_LIMIT)?;
    Ok(Json(
        playlists::current_user_playlists(&state.spotify, paging).await?,
    ))
}

pub async fn create_my_playlist(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let body = parse_body::<NewPlaylistBody>(&body)?;
    let created = create_for_current_user(&state, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn user_playlists(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<QueryMap>,
) -> ApiResult<Json<Value>> {
    let paging = paging(&params, DEFAULT_LIMIT)?;
    Ok(Json(
        playlists::user_playlists(&state.spotify, &user_id, paging).await?,
    ))
}

pub async fn create_user_playlist(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let request = create_request(parse_body::<NewPlaylistBody>(&body)?)?;
    let created = playlists::create(&state.spotify, &user_id, &request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> ApiResult<Json<Value>> {
    Ok(Json(playlists::get(&state.spotify, &playlist_id).await?))
}

/// Handles both `PUT` and the `PATCH` alias.
pub async fn change_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let request = parse_body::<ChangePlaylistRequest>(&body)?;
    playlists::change_details(&state.spotify, &playlist_id, &request).await?;
    Ok(Json(json!({ "status": "updated" })))
}

pub async fn playlist_items(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    Query(params): Query<QueryMap>,
) -> ApiResult<Json<Value>> {
    let paging = paging(&params, DEFAULT_PLAYLIST_ITEMS_LIMIT)?;
    Ok(Json(
        playlists::items(&state.spotify, &playlist_id, paging).await?,
    ))
}

pub async fn add_items(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let body = parse_body::<AddItemsBody>(&body)?;
    let uris = body
        .uris
        .filter(|uris| !uris.is_empty())
        .ok_or_else(|| ApiError::validation("uris is required"))?;

    let result =
        playlists::add_items(&state.spotify, &playlist_id, &uris, body.position).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn remove_items(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let body = parse_body::<RemoveItemsBody>(&body)?;
    remove(&state, &playlist_id, body).await
}

pub async fn reorder_items(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let body = parse_body::<ReorderBody>(&body)?;
    reorder(&state, &playlist_id, body).await
}

pub async fn follow_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let body = parse_body::<FollowPlaylistBody>(&body)?;
    playlists::follow(&state.spotify, &playlist_id, body.public.unwrap_or(false)).await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn unfollow_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> ApiResult<Json<Value>> {
    playlists::unfollow(&state.spotify, &playlist_id).await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn add_from_names(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let body = parse_body::<FromNamesBody>(&body)?;
    add_by_names(&state, &playlist_id, body).await
}

pub(crate) async fn create_for_current_user(
    state: &AppState,
    body: NewPlaylistBody,
) -> ApiResult<Value> {
    let request = create_request(body)?;
    let user_id = library::current_user_id(&state.spotify).await?;
    playlists::create(&state.spotify, &user_id, &request).await
}

pub(crate) async fn remove(
    state: &AppState,
    playlist_id: &str,
    body: RemoveItemsBody,
) -> ApiResult<Json<Value>> {
    let tracks = body
        .tracks
        .filter(|tracks| !tracks.is_empty())
        .ok_or_else(|| ApiError::validation("tracks is required"))?;
    let request = RemoveItemsRequest {
        tracks,
        snapshot_id: body.snapshot_id,
    };

    Ok(Json(
        playlists::remove_items(&state.spotify, playlist_id, &request).await?,
    ))
}

pub(crate) async fn reorder(
    state: &AppState,
    playlist_id: &str,
    body: ReorderBody,
) -> ApiResult<Json<Value>> {
    let (Some(range_start), Some(insert_before)) = (body.range_start, body.insert_before) else {
        return Err(ApiError::validation(
            "range_start and insert_before are required",
        ));
    };
    let request = ReorderItemsRequest {
        range_start,
        insert_before,
        range_length: body.range_length.unwrap_or(1),
        snapshot_id: body.snapshot_id,
    };

    Ok(Json(
        playlists::reorder_items(&state.spotify, playlist_id, &request).await?,
    ))
}

pub(crate) async fn add_by_names(
    state: &AppState,
    playlist_id: &str,
    body: FromNamesBody,
) -> ApiResult<Json<Value>> {
    let names = body
        .track_names
        .filter(|names| !names.is_empty())
        .ok_or_else(|| ApiError::validation("track_names is required"))?;

    tracks::add_tracks_by_name(
        &state.spotify,
        playlist_id,
        &names,
        body.artist_name.as_deref(),
    )
    .await?;

    Ok(Json(json!({ "added_tracks": names })))
}

fn create_request(body: NewPlaylistBody) -> ApiResult<CreatePlaylistRequest> {
    let name = body
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::validation("name is required"))?;

    Ok(CreatePlaylistRequest {
        name,
        description: body.description.unwrap_or_default(),
        public: body.public.unwrap_or(false),
    })
}
