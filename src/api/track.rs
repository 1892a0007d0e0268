use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::{api::ApiError, server::ServerState};

/// Body of the `/track/*` endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackIdsRequest {
    pub identity_id: Option<String>,
    pub ids: Vec<String>,
}

pub async fn tracks_saved(
    State(state): State<ServerState>,
    Json(req): Json<TrackIdsRequest>,
) -> Result<Json<Vec<bool>>, ApiError> {
    let identity = state.app.identity(req.identity_id)?;
    Ok(Json(state.app.tracks_saved(&identity, &req.ids).await?))
}

pub async fn save_tracks(
    State(state): State<ServerState>,
    Json(req): Json<TrackIdsRequest>,
) -> Result<StatusCode, ApiError> {
    let identity = state.app.identity(req.identity_id)?;
    state.app.save_tracks(&identity, &req.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_tracks(
    State(state): State<ServerState>,
    Json(req): Json<TrackIdsRequest>,
) -> Result<StatusCode, ApiError> {
    let identity = state.app.identity(req.identity_id)?;
    state.app.remove_tracks(&identity, &req.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}
