use tracing::{debug, info};

use crate::{
    error::FetchError,
    recommend::filter::rank_candidates,
    spotify::catalog::Catalog,
    types::{Seed, Track},
};

/// Ids accepted by a single bulk track lookup.
pub const TRACK_BATCH_SIZE: usize = 50;

/// Tracks requested from the recommendation endpoint.
pub const RECOMMENDATION_LIMIT: u32 = 100;

/// Every track on every release the seed artist appears on, minus the
/// library, most popular first.
pub async fn discography(
    catalog: &dyn Catalog,
    token: &str,
    seed: &Seed,
    library: &[Track],
) -> Result<Vec<Track>, FetchError> {
    let albums = catalog.artist_albums(token, seed.artist_id()).await?;
    info!(artist = seed.artist_id(), albums = albums.len(), "albums found");

    let mut ids: Vec<String> = Vec::new();
    for album in &albums {
        let tracks = catalog.album_tracks(token, &album.id).await?;
        debug!(album = %album.id, tracks = tracks.len(), "album tracks fetched");
        ids.extend(tracks.into_iter().map(|t| t.id));
    }

    // album listings carry no popularity, so look the tracks up in bulk
    let mut tracks = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(TRACK_BATCH_SIZE) {
        let details = catalog.tracks_by_ids(token, chunk).await?;
        tracks.extend(details.into_iter().flatten());
    }

    Ok(rank_candidates(tracks, library))
}

/// Spotify's own recommendations for the seed artist (and song, if any).
pub async fn external(
    catalog: &dyn Catalog,
    token: &str,
    seed: &Seed,
    library: &[Track],
) -> Result<Vec<Track>, FetchError> {
    let tracks = catalog
        .recommendations(token, seed.artist_id(), seed.song_id(), RECOMMENDATION_LIMIT)
        .await?;
    info!(
        artist = seed.artist_id(),
        tracks = tracks.len(),
        "recommendations received"
    );

    Ok(rank_candidates(tracks, library))
}
