use axum::{
    extract::{Query, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

use crate::{
    api::{
        AppState,
        params::{QueryMap, text_param},
    },
    error::{ApiError, ApiResult},
};

pub async fn get_song_lyric(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> ApiResult<Response> {
    let (Some(artist), Some(track)) = (
        text_param(&params, "artist_name"),
        text_param(&params, "track_name"),
    ) else {
        return Err(ApiError::validation(
            "artist_name and track_name are required",
        ));
    };

    let lyrics = state.lyrics.lookup(artist, track).await?;
    let body = serde_json::to_string_pretty(&lyrics)
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(([(CONTENT_TYPE, "application/json; charset=utf-8")], body).into_response())
}
