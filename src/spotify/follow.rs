use serde_json::{Value, json};

use crate::{error::ApiResult, spotify::SpotifyClient, types::FollowType};

/// Whether the current user follows each of the given artists or users.
pub async fn contains(
    client: &SpotifyClient,
    follow_type: FollowType,
    ids: &[String],
) -> ApiResult<Value> {
    client
        .get(
            "/me/following/contains",
            &[
                ("type", follow_type.as_str().to_string()),
                ("ids", ids.join(",")),
            ],
        )
        .await
}

pub async fn follow(
    client: &SpotifyClient,
    follow_type: FollowType,
    ids: &[String],
) -> ApiResult<Value> {
    client
        .put(
            "/me/following",
            &[("type", follow_type.as_str().to_string())],
            Some(&json!({ "ids": ids })),
        )
        .await
}

pub async fn unfollow(
    client: &SpotifyClient,
    follow_type: FollowType,
    ids: &[String],
) -> ApiResult<Value> {
    client
        .delete(
            "/me/following",
            &[("type", follow_type.as_str().to_string())],
            Some(&json!({ "ids": ids })),
        )
        .await
}
