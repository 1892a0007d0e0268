//! # API Module
//!
//! HTTP endpoints of the local server.
//!
//! ## Endpoints
//!
//! - [`health`] - liveness and version
//! - [`login`] - starts an authorization-code login and redirects to Spotify
//! - [`callback`] - completes the login started by [`login`] or `getunes auth`
//! - [`access_token`] - a fresh access token for the web player
//! - [`search`] - searches the catalog for seed candidates
//! - [`playlist`] - recommends tracks and saves them as a new playlist
//! - [`recent_tracks`], [`favorites`] - listening history and top items
//! - [`getunes_playlists`] - playlists created for the identity, with tracks
//! - [`tracks_saved`], [`save_tracks`], [`remove_tracks`] - the saved-tracks
//!   library
//!
//! Identity-scoped endpoints take an `identityId`; when it is absent the
//! configured default identity is used.

mod auth;
mod health;
mod playlist;
mod search;
mod track;
mod user;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::error::{AuthError, Error, FetchError, StorageError};

pub use auth::{AccessTokenResponse, IdentityParams, access_token, callback, login};
pub use health::health;
pub use playlist::{PlaylistRequest, playlist};
pub use search::{SearchParams, search};
pub use track::{TrackIdsRequest, remove_tracks, save_tracks, tracks_saved};
pub use user::{FavoritesParams, favorites, getunes_playlists, recent_tracks};

/// An [`Error`] rendered as a JSON response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError(err.into())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::Auth(AuthError::UnknownIdentity(_) | AuthError::MissingRefreshToken(_)) => {
                StatusCode::UNAUTHORIZED
            }
            Error::Auth(_) => StatusCode::BAD_GATEWAY,
            Error::Fetch(FetchError::Unauthorized { .. }) => StatusCode::UNAUTHORIZED,
            Error::Fetch(_) => StatusCode::BAD_GATEWAY,
            Error::Storage(StorageError::InvalidKey(_)) | Error::Config(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Storage(_) | Error::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = status.as_u16(), error = %self.0, "request failed");
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
