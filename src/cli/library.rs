use tabled::Table;

use crate::{app::App, error, info, success, types::TimeRange, utils};

pub async fn import_library(app: &App, identity: Option<String>) {
    let identity = match app.identity(identity) {
        Ok(identity) => identity,
        Err(e) => error!("{}", e),
    };

    let pb = utils::spinner(format!("Importing library of {}...", identity));
    let result = app.import_library(&identity).await;
    pb.finish_and_clear();

    match result {
        Ok(summary) => success!(
            "Imported {} saved tracks and {} tracks from {} playlists",
            summary.saved_tracks,
            summary.playlist_tracks,
            summary.playlists
        ),
        Err(e) => error!("Failed to import library: {}", e),
    }
}

pub async fn top_artists(app: &App, identity: Option<String>, limit: usize) {
    let identity = match app.identity(identity) {
        Ok(identity) => identity,
        Err(e) => error!("{}", e),
    };

    let counts = match app.top_artists(&identity).await {
        Ok(counts) => counts,
        Err(e) => error!("Failed to read library: {}", e),
    };

    if counts.is_empty() {
        info!("Library is empty. Run `getunes library import` first.");
        return;
    }

    let rows = utils::artist_count_rows(&counts[..limit.min(counts.len())]);
    println!("{}", Table::new(rows));
}

pub async fn recent_tracks(app: &App, identity: Option<String>) {
    let identity = match app.identity(identity) {
        Ok(identity) => identity,
        Err(e) => error!("{}", e),
    };

    let played = match app.recent_tracks(&identity).await {
        Ok(played) => played,
        Err(e) => error!("Failed to fetch recently played tracks: {}", e),
    };

    if played.is_empty() {
        info!("Nothing played recently.");
        return;
    }

    println!("{}", Table::new(utils::played_rows(&played)));
}

pub async fn favorites(app: &App, identity: Option<String>, range: TimeRange) {
    let identity = match app.identity(identity) {
        Ok(identity) => identity,
        Err(e) => error!("{}", e),
    };

    let pb = utils::spinner("Fetching top tracks and artists...");
    let result = app.favorites(&identity, range).await;
    pb.finish_and_clear();

    let favorites = match result {
        Ok(favorites) => favorites,
        Err(e) => error!("Failed to fetch favorites: {}", e),
    };

    if favorites.top_tracks.is_empty() && favorites.top_artists.is_empty() {
        info!("Not enough listening history yet.");
        return;
    }

    info!("Top tracks ({})", range.as_str());
    println!("{}", Table::new(utils::track_rows(&favorites.top_tracks)));
    info!("Top artists ({})", range.as_str());
    println!("{}", Table::new(utils::artist_rows(&favorites.top_artists)));
}
