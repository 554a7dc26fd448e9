use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::Value;

use crate::{
    api::{
        AppState,
        params::{DEFAULT_LIMIT, QueryMap, paging, text_param},
    },
    error::{ApiError, ApiResult},
    spotify::catalog,
};

const DEFAULT_MARKET: &str = "ES";

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> ApiResult<Json<Value>> {
    let (Some(q), Some(search_type)) = (text_param(&params, "q"), text_param(&params, "type"))
    else {
        return Err(ApiError::validation("q and type are required"));
    };
    let paging = paging(&params, DEFAULT_LIMIT)?;

    Ok(Json(
        catalog::search(&state.spotify, q, search_type, paging).await?,
    ))
}

/// Passes every query parameter except `limit` through to Spotify.
pub async fn recommendations(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Value>> {
    let mut limit = DEFAULT_LIMIT;
    let mut rest = Vec::with_capacity(params.len());
    for (key, value) in params {
        if key == "limit" {
            limit = value
                .trim()
                .parse()
                .map_err(|_| ApiError::validation("limit must be a non-negative integer"))?;
        } else {
            rest.push((key, value));
        }
    }

    Ok(Json(
        catalog::recommendations(&state.spotify, limit, &rest).await?,
    ))
}

pub async fn artist(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> ApiResult<Json<Value>> {
    Ok(Json(catalog::artist(&state.spotify, &artist_id).await?))
}

pub async fn artist_top_tracks(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
    Query(params): Query<QueryMap>,
) -> ApiResult<Json<Value>> {
    let market = text_param(&params, "market").unwrap_or(DEFAULT_MARKET);
    Ok(Json(
        catalog::artist_top_tracks(&state.spotify, &artist_id, market).await?,
    ))
}

pub async fn audio_features(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
) -> ApiResult<Json<Value>> {
    Ok(Json(
        catalog::audio_features(&state.spotify, &track_id).await?,
    ))
}

pub async fn audio_analysis(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
) -> ApiResult<Json<Value>> {
    Ok(Json(
        catalog::audio_analysis(&state.spotify, &track_id).await?,
    ))
}
