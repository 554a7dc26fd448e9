use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};

use crate::{
    api::{
        AppState,
        params::{DEFAULT_LIMIT, QueryMap, int_param, paging, parse_body, text_param},
    },
    error::{ApiError, ApiResult},
    spotify::{
        follow,
        library::{self, SavedKind},
    },
    types::{FollowType, IdList, IdsBody, TopItemType},
};

pub async fn profile(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(Json(library::profile(&state.spotify).await?))
}

pub async fn top_items(
    State(state): State<AppState>,
    Path(item_type): Path<String>,
    Query(params): Query<QueryMap>,
) -> ApiResult<Json<Value>> {
    let item_type = TopItemType::parse(&item_type)
        .ok_or_else(|| ApiError::validation("item_type must be artists or tracks"))?;
    top_items_of(&state, item_type, &params).await
}

pub(crate) async fn top_items_of(
    state: &AppState,
    item_type: TopItemType,
    params: &QueryMap,
) -> ApiResult<Json<Value>> {
    let time_range = text_param(params, "time_range").unwrap_or("medium_term");
    let paging = paging(params, DEFAULT_LIMIT)?;
    Ok(Json(
        library::top_items(&state.spotify, item_type, time_range, paging).await?,
    ))
}

pub async fn recently_played(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> ApiResult<Json<Value>> {
    let limit = int_param(&params, "limit", DEFAULT_LIMIT)?;
    let after = text_param(&params, "after").map(str::to_string);
    Ok(Json(
        library::recently_played(&state.spotify, limit, after).await?,
    ))
}

pub async fn followed_artists(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> ApiResult<Json<Value>> {
    let limit = int_param(&params, "limit", DEFAULT_LIMIT)?;
    let after = text_param(&params, "after").map(str::to_string);
    Ok(Json(
        library::followed_artists(&state.spotify, limit, after).await?,
    ))
}

pub async fn saved_tracks(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> ApiResult<Json<Value>> {
    list_saved(&state, SavedKind::Tracks, &params).await
}

pub async fn save_tracks(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Value>> {
    change_saved(&state, SavedKind::Tracks, true, &body).await
}

pub async fn remove_saved_tracks(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    change_saved(&state, SavedKind::Tracks, false, &body).await
}

pub async fn saved_albums(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> ApiResult<Json<Value>> {
    list_saved(&state, SavedKind::Albums, &params).await
}

pub async fn save_albums(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Value>> {
    change_saved(&state, SavedKind::Albums, true, &body).await
}

pub async fn remove_saved_albums(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    change_saved(&state, SavedKind::Albums, false, &body).await
}

async fn list_saved(
    state: &AppState,
    kind: SavedKind,
    params: &QueryMap,
) -> ApiResult<Json<Value>> {
    let paging = paging(params, DEFAULT_LIMIT)?;
    Ok(Json(library::saved(&state.spotify, kind, paging).await?))
}

async fn change_saved(
    state: &AppState,
    kind: SavedKind,
    add: bool,
    body: &[u8],
) -> ApiResult<Json<Value>> {
    let ids = required_ids(parse_body::<IdsBody>(body)?)?;
    if add {
        library::save(&state.spotify, kind, &ids).await?;
    } else {
        library::remove(&state.spotify, kind, &ids).await?;
    }
    Ok(Json(json!({ "status": "ok" })))
}

/// Follow check for `GET /me/following?type=artist|user&ids=a,b`.
pub async fn following_contains(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> ApiResult<Json<Value>> {
    let follow_type = follow_type(&params)?;
    let ids = text_param(&params, "ids")
        .map(|raw| IdList::Csv(raw.to_string()).into_vec())
        .unwrap_or_default();
    if ids.is_empty() {
        return Err(ApiError::validation("ids is required"));
    }
    Ok(Json(follow::contains(&state.spotify, follow_type, &ids).await?))
}

pub async fn add_following(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let follow_type = follow_type(&params)?;
    let ids = required_ids(parse_body::<IdsBody>(&body)?)?;
    follow::follow(&state.spotify, follow_type, &ids).await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn remove_following(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let follow_type = follow_type(&params)?;
    let ids = required_ids(parse_body::<IdsBody>(&body)?)?;
    follow::unfollow(&state.spotify, follow_type, &ids).await?;
    Ok(Json(json!({ "status": "ok" })))
}

fn follow_type(params: &QueryMap) -> ApiResult<FollowType> {
    text_param(params, "type")
        .and_then(FollowType::parse)
        .ok_or_else(|| ApiError::validation("type must be artist or user"))
}

fn required_ids(body: IdsBody) -> ApiResult<Vec<String>> {
    let ids = body.ids.map(|ids| ids.into_vec()).unwrap_or_default();
    if ids.is_empty() {
        return Err(ApiError::validation("ids is required"));
    }
    Ok(ids)
}
