use tracing::{debug, info};

use crate::{
    error::FetchError,
    recommend::{
        filter::{filter_library, rank_by_popularity},
        oracle::is_known,
    },
    spotify::catalog::Catalog,
    types::{Seed, Track},
};

/// Playlists requested per search round; also the offset step between rounds.
pub const SEARCH_PAGE_SIZE: u32 = 5;

/// Collects novel tracks from playlists matching the seed, widening the
/// search five playlists at a time until `target` tracks are found, a round
/// finds no playlists, or `max_rounds` rounds have run.
///
/// Playlists that never credit the seed artist are ignored. Each round's
/// finds are ranked by popularity and appended after the previous rounds'.
/// The engine re-sorts the whole list by popularity afterwards, so round
/// order only decides between tracks of equal popularity. A track
/// equivalent to one already collected in any round is skipped.
pub async fn related_songs(
    catalog: &dyn Catalog,
    token: &str,
    seed: &Seed,
    library: &[Track],
    target: usize,
    max_rounds: u32,
) -> Result<Vec<Track>, FetchError> {
    let query = seed.search_query();
    let mut found: Vec<Track> = Vec::new();
    let mut offset = 0u32;

    for round in 1..=max_rounds.max(1) {
        let playlists = catalog
            .search_playlists(token, &query, SEARCH_PAGE_SIZE, offset)
            .await?;
        info!(
            query = %query,
            round,
            offset,
            playlists = playlists.len(),
            "playlist search"
        );

        if playlists.is_empty() {
            break;
        }

        let mut novel: Vec<Track> = Vec::new();
        for playlist in &playlists {
            let tracks = catalog.playlist_tracks(token, &playlist.id).await?;

            if !tracks.iter().any(|t| t.has_artist(seed.artist_id())) {
                debug!(playlist = %playlist.id, "seed artist not in playlist, skipped");
                continue;
            }

            for track in filter_library(tracks, library) {
                if !is_known(&track, &found) && !is_known(&track, &novel) {
                    novel.push(track);
                }
            }
        }

        rank_by_popularity(&mut novel);
        found.extend(novel);
        debug!(round, found = found.len(), target, "search round done");

        if found.len() >= target {
            break;
        }
        offset += SEARCH_PAGE_SIZE;
    }

    Ok(found)
}
