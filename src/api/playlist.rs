use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    api::ApiError,
    server::ServerState,
    types::{CreatedPlaylist, Method, Seed},
};

/// Body of `POST /playlist`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRequest {
    pub identity_id: Option<String>,
    pub method: Method,
    pub seed: Seed,
    #[serde(default = "default_num")]
    pub num: usize,
}

fn default_num() -> usize {
    20
}

pub async fn playlist(
    State(state): State<ServerState>,
    Json(req): Json<PlaylistRequest>,
) -> Result<Json<CreatedPlaylist>, ApiError> {
    let identity = state.app.identity(req.identity_id)?;
    let created = state
        .app
        .create_playlist(&identity, req.method, &req.seed, req.num)
        .await?;
    Ok(Json(created))
}
