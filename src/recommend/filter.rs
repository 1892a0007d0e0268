use std::cmp::Reverse;

use crate::{recommend::oracle, types::Track};

/// Drops every candidate the library already contains, keeping order.
pub fn filter_library(candidates: Vec<Track>, library: &[Track]) -> Vec<Track> {
    candidates
        .into_iter()
        .filter(|t| !oracle::is_known(t, library))
        .collect()
}

/// Sorts by popularity, most popular first. Ties keep their input order.
pub fn rank_by_popularity(tracks: &mut [Track]) {
    tracks.sort_by_key(|t| Reverse(t.popularity));
}

/// Library filter, duplicate removal and popularity ranking.
pub fn rank_candidates(candidates: Vec<Track>, library: &[Track]) -> Vec<Track> {
    let mut tracks = dedup_equivalent(filter_library(candidates, library));
    rank_by_popularity(&mut tracks);
    tracks
}

/// Keeps the first track of every group of equivalent tracks.
pub fn dedup_equivalent(tracks: Vec<Track>) -> Vec<Track> {
    let mut unique: Vec<Track> = Vec::with_capacity(tracks.len());
    for track in tracks {
        if !oracle::is_known(&track, &unique) {
            unique.push(track);
        }
    }
    unique
}
