use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    api::{ApiError, IdentityParams},
    server::ServerState,
    types::{Favorites, GetunesPlaylist, PlayedTrack, TimeRange},
};

pub async fn recent_tracks(
    State(state): State<ServerState>,
    Query(params): Query<IdentityParams>,
) -> Result<Json<Vec<PlayedTrack>>, ApiError> {
    let identity = state.app.identity(params.identity_id)?;
    Ok(Json(state.app.recent_tracks(&identity).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesParams {
    pub identity_id: Option<String>,
    #[serde(default)]
    pub time_range: TimeRange,
}

pub async fn favorites(
    State(state): State<ServerState>,
    Query(params): Query<FavoritesParams>,
) -> Result<Json<Favorites>, ApiError> {
    let identity = state.app.identity(params.identity_id)?;
    Ok(Json(state.app.favorites(&identity, params.time_range).await?))
}

pub async fn getunes_playlists(
    State(state): State<ServerState>,
    Query(params): Query<IdentityParams>,
) -> Result<Json<Vec<GetunesPlaylist>>, ApiError> {
    let identity = state.app.identity(params.identity_id)?;
    Ok(Json(state.app.getunes_playlists(&identity).await?))
}
