use serde_json::{Value, json};

use crate::{
    error::ApiResult,
    spotify::{Paging, SpotifyClient},
    types::{TopItemType, UserProfile},
};

/// Which part of the saved library a call is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedKind {
    Tracks,
    Albums,
}

impl SavedKind {
    fn path(&self) -> &'static str {
        match self {
            SavedKind::Tracks => "/me/tracks",
            SavedKind::Albums => "/me/albums",
        }
    }
}

pub async fn profile(client: &SpotifyClient) -> ApiResult<Value> {
    client.get("/me", &[]).await
}

pub async fn current_user_id(client: &SpotifyClient) -> ApiResult<String> {
    let profile: UserProfile = client.get_as("/me", &[]).await?;
    Ok(profile.id)
}

pub async fn top_items(
    client: &SpotifyClient,
    item_type: TopItemType,
    time_range: &str,
    paging: Paging,
) -> ApiResult<Value> {
    let mut query = paging.params();
    query.push(("time_range", time_range.to_string()));
    client
        .get(&format!("/me/top/{}", item_type.as_str()), &query)
        .await
}

pub async fn recently_played(
    client: &SpotifyClient,
    limit: u32,
    after: Option<String>,
) -> ApiResult<Value> {
    let mut query = vec![("limit", limit.to_string())];
    if let Some(after) = after {
        query.push(("after", after));
    }
    client.get("/me/player/recently-played", &query).await
}

pub async fn followed_artists(
    client: &SpotifyClient,
    limit: u32,
    after: Option<String>,
) -> ApiResult<Value> {
    let mut query = vec![("type", "artist".to_string()), ("limit", limit.to_string())];
    if let Some(after) = after {
        query.push(("after", after));
    }
    client.get("/me/following", &query).await
}

pub async fn saved(client: &SpotifyClient, kind: SavedKind, paging: Paging) -> ApiResult<Value> {
    client.get(kind.path(), &paging.params()).await
}

pub async fn save(client: &SpotifyClient, kind: SavedKind, ids: &[String]) -> ApiResult<Value> {
    client.put(kind.path(), &[], Some(&json!({ "ids": ids }))).await
}

pub async fn remove(client: &SpotifyClient, kind: SavedKind, ids: &[String]) -> ApiResult<Value> {
    client
        .delete(kind.path(), &[], Some(&json!({ "ids": ids })))
        .await
}
