//! # API Module
//!
//! HTTP surface of the spotbot server. Every route except the liveness
//! endpoints sits behind [`auth::require_bearer`], which compares the
//! `Authorization` header against the static API token before any handler
//! (and therefore any Spotify call) runs.
//!
//! ## Route groups
//!
//! - [`health`] - `GET /` and `GET /health`, unprotected
//! - [`debug`] - token introspection (`/debug`, `/validate_token`)
//! - [`me`] - profile, top items, recently played, library and follows
//! - [`catalog`] - search, recommendations, artists and audio analysis
//! - [`playlists`] - playlist CRUD, items and name based track resolution
//! - [`lyrics`] - lyrics lookup through lyrics.ovh
//! - [`legacy`] - older route shapes mapped onto the ones above
//!
//! [`callback`] is not part of this router; it is served by the short lived
//! server that `spotbot auth` starts to receive the authorization code.
//!
//! ## Errors
//!
//! Handlers return [`crate::error::ApiResult`]. Failures are rendered as
//! `{"error": "<message>"}` with `400`, `401`, `404` or `500`.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use spotbot::api::{self, AppState};
//!
//! let state = AppState::new(config, spotify, lyrics);
//! let app = api::router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod callback;
pub mod catalog;
pub mod debug;
pub mod health;
pub mod legacy;
pub mod lyrics;
pub mod me;
pub mod params;
pub mod playlists;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::{
    config::Config, lyrics::LyricsClient, management::TokenManager, spotify::SpotifyClient,
};

pub use callback::callback;

/// Shared, cheaply clonable state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub spotify: SpotifyClient,
    pub lyrics: LyricsClient,
}

impl AppState {
    pub fn new(config: Config, spotify: SpotifyClient, lyrics: LyricsClient) -> Self {
        AppState {
            config: Arc::new(config),
            spotify,
            lyrics,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        self.spotify.tokens()
    }

    pub fn api_token(&self) -> &str {
        &self.config.credentials.api_token
    }
}

/// Builds the complete router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/debug", get(debug::debug))
        .route("/validate_token", get(debug::validate_token))
        .route("/get_song_lyric", get(lyrics::get_song_lyric))
        // current user
        .route("/me", get(me::profile))
        .route("/me/top/{item_type}", get(me::top_items))
        .route("/me/player/recently-played", get(me::recently_played))
        .route("/me/following/artists", get(me::followed_artists))
        .route(
            "/me/following",
            get(me::following_contains)
                .put(me::add_following)
                .delete(me::remove_following),
        )
        .route(
            "/me/tracks",
            get(me::saved_tracks)
                .put(me::save_tracks)
                .delete(me::remove_saved_tracks),
        )
        .route(
            "/me/albums",
            get(me::saved_albums)
                .put(me::save_albums)
                .delete(me::remove_saved_albums),
        )
        // catalog
        .route("/search", get(catalog::search))
        .route("/recommendations", get(catalog::recommendations))
        .route("/artists/{id}", get(catalog::artist))
        .route("/artists/{id}/top-tracks", get(catalog::artist_top_tracks))
        .route("/audio-features/{id}", get(catalog::audio_features))
        .route("/audio-analysis/{id}", get(catalog::audio_analysis))
        // playlists
        .route(
            "/me/playlists",
            get(playlists::my_playlists).post(playlists::create_my_playlist),
        )
        .route(
            "/users/{user_id}/playlists",
            get(playlists::user_playlists).post(playlists::create_user_playlist),
        )
        .route(
            "/playlists/{id}",
            get(playlists::get_playlist)
                .put(playlists::change_playlist)
                .patch(playlists::change_playlist),
        )
        .route(
            "/playlists/{id}/tracks",
            get(playlists::playlist_items)
                .post(playlists::add_items)
                .put(playlists::reorder_items)
                .delete(playlists::remove_items),
        )
        .route(
            "/playlists/{id}/tracks/from-names",
            post(playlists::add_from_names),
        )
        .route(
            "/playlists/{id}/followers",
            put(playlists::follow_playlist).delete(playlists::unfollow_playlist),
        )
        // legacy
        .route("/user/profile", get(me::profile))
        .route("/user/top_artists", get(legacy::top_artists))
        .route("/user/top_tracks", get(legacy::top_tracks))
        .route("/user/recently_played", get(me::recently_played))
        .route("/user/followed_artists", get(me::followed_artists))
        .route("/library/saved_tracks", get(me::saved_tracks))
        .route("/library/saved_albums", get(me::saved_albums))
        .route("/get_user_playlists", get(playlists::my_playlists))
        .route("/create_playlist", post(legacy::create_playlist))
        .route(
            "/playlists/{id}/remove_tracks",
            delete(legacy::remove_tracks),
        )
        .route(
            "/playlists/{id}/reorder_tracks",
            post(legacy::reorder_tracks),
        )
        .route("/add_tracks_to_playlist", post(legacy::add_tracks_to_playlist))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .merge(protected)
        .with_state(state)
}
