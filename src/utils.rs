use std::{collections::HashMap, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};

use crate::types::{
    Artist, ArtistCount, ArtistCountTableRow, ArtistRef, ArtistTableRow, GetunesPlaylist,
    PlayedTableRow, PlayedTrack, PlaylistTableRow, SavedTableRow, SearchHit, SearchTableRow,
    Track, TrackTableRow,
};

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Counts artist credits across a library, most credited first.
///
/// Artists with equal counts keep the order in which they were first seen.
pub fn top_artists(library: &[Track]) -> Vec<ArtistCount> {
    let mut counts: Vec<ArtistCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for artist in library.iter().flat_map(|t| t.artists.iter()) {
        match index.get(artist.id.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(artist.id.as_str(), counts.len());
                counts.push(ArtistCount {
                    id: artist.id.clone(),
                    name: artist.name.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

pub fn join_artist_names(artists: &[ArtistRef]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn track_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .map(|t| TrackTableRow {
            popularity: t.popularity,
            name: t.name.clone(),
            artists: join_artist_names(&t.artists),
        })
        .collect()
}

pub fn search_rows(hits: &[SearchHit]) -> Vec<SearchTableRow> {
    hits.iter()
        .map(|h| SearchTableRow {
            id: h.id.clone(),
            name: h.name.clone(),
            artists: join_artist_names(&h.artists),
        })
        .collect()
}

pub fn artist_count_rows(counts: &[ArtistCount]) -> Vec<ArtistCountTableRow> {
    counts
        .iter()
        .map(|c| ArtistCountTableRow {
            count: c.count,
            name: c.name.clone(),
            id: c.id.clone(),
        })
        .collect()
}

pub fn played_rows(played: &[PlayedTrack]) -> Vec<PlayedTableRow> {
    played
        .iter()
        .map(|p| PlayedTableRow {
            played_at: p.played_at.clone(),
            name: p.track.name.clone(),
            artists: join_artist_names(&p.track.artists),
        })
        .collect()
}

pub fn artist_rows(artists: &[Artist]) -> Vec<ArtistTableRow> {
    artists
        .iter()
        .map(|a| ArtistTableRow {
            popularity: a.popularity,
            name: a.name.clone(),
            genres: a.genres.join(", "),
        })
        .collect()
}

pub fn playlist_rows(playlists: &[GetunesPlaylist]) -> Vec<PlaylistTableRow> {
    playlists
        .iter()
        .map(|p| PlaylistTableRow {
            name: p.playlist.name.clone(),
            tracks: p.tracks.len(),
            uri: p.playlist.uri.clone(),
        })
        .collect()
}

/// Pairs each id with its saved flag; missing flags read as not saved.
pub fn saved_rows(ids: &[String], saved: &[bool]) -> Vec<SavedTableRow> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| SavedTableRow {
            id: id.clone(),
            saved: saved.get(i).copied().unwrap_or(false),
        })
        .collect()
}

/// A ticking spinner for long-running commands.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
