use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// The access token currently used against the Spotify Web API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenState {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenState {
    /// A token is valid strictly before its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Answer of the token endpoint for both the authorization-code and the
/// refresh-token grants.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub state: String,
    pub code: Option<Result<String, String>>,
}

#[derive(Tabled)]
pub struct SettingTableRow {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopItemType {
    Artists,
    Tracks,
}

impl TopItemType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "artists" => Some(TopItemType::Artists),
            "tracks" => Some(TopItemType::Tracks),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TopItemType::Artists => "artists",
            TopItemType::Tracks => "tracks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowType {
    Artist,
    User,
}

impl FollowType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "artist" => Some(FollowType::Artist),
            "user" => Some(FollowType::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FollowType::Artist => "artist",
            FollowType::User => "user",
        }
    }
}

/// Ids given either as a JSON list or as one comma separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdList {
    List(Vec<String>),
    Csv(String),
}

impl IdList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            IdList::List(ids) => ids,
            IdList::Csv(raw) => raw
                .split(',')
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdsBody {
    #[serde(default)]
    pub ids: Option<IdList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPlaylistBody {
    pub name: Option<String>,
    pub public: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangePlaylistRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddItemsBody {
    pub uris: Option<Vec<String>>,
    pub position: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRef {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoveItemsBody {
    pub tracks: Option<Vec<TrackRef>>,
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveItemsRequest {
    pub tracks: Vec<TrackRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReorderBody {
    pub range_start: Option<u32>,
    pub insert_before: Option<u32>,
    pub range_length: Option<u32>,
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReorderItemsRequest {
    pub range_start: u32,
    pub insert_before: u32,
    pub range_length: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowPlaylistBody {
    pub public: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FromNamesBody {
    pub track_names: Option<Vec<String>>,
    pub artist_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyCreatePlaylistBody {
    pub playlist_name: Option<String>,
    pub public: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyRemoveTracksBody {
    pub track_uris: Option<Vec<String>>,
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyAddTracksBody {
    pub playlist_id: Option<String>,
    pub track_names: Option<Vec<String>>,
    pub artist_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchTracksResponse {
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
}

/// Raw answer of lyrics.ovh; exactly one of the fields is set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LyricsOvhResponse {
    pub lyrics: Option<String>,
    pub error: Option<String>,
}

/// Lyrics as returned to callers; field order is part of the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lyrics {
    pub artist: String,
    pub track: String,
    pub lyrics: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DebugInfo {
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub access_token: String,
    pub token_expired: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenStatus {
    pub access_token: String,
    pub token_expired: bool,
}
