use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    api::ApiError,
    server::ServerState,
    types::{SearchHit, SearchType},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub identity_id: Option<String>,
    pub query: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: SearchType,
    pub limit: Option<u32>,
}

fn default_kind() -> SearchType {
    SearchType::Artist
}

pub async fn search(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let identity = state.app.identity(params.identity_id)?;
    let limit = params.limit.unwrap_or(10).clamp(1, 50);

    let hits = state
        .app
        .search(&identity, &params.query, params.kind, limit)
        .await?;
    Ok(Json(hits))
}
