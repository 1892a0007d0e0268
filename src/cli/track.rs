use tabled::Table;

use crate::{app::App, error, success, utils};

pub async fn tracks_saved(app: &App, identity: Option<String>, ids: &[String]) {
    let identity = match app.identity(identity) {
        Ok(identity) => identity,
        Err(e) => error!("{}", e),
    };

    match app.tracks_saved(&identity, ids).await {
        Ok(saved) => println!("{}", Table::new(utils::saved_rows(ids, &saved))),
        Err(e) => error!("Failed to check tracks: {}", e),
    }
}

pub async fn save_tracks(app: &App, identity: Option<String>, ids: &[String]) {
    let identity = match app.identity(identity) {
        Ok(identity) => identity,
        Err(e) => error!("{}", e),
    };

    match app.save_tracks(&identity, ids).await {
        Ok(()) => success!("Saved {} tracks to the library", ids.len()),
        Err(e) => error!("Failed to save tracks: {}", e),
    }
}

pub async fn remove_tracks(app: &App, identity: Option<String>, ids: &[String]) {
    let identity = match app.identity(identity) {
        Ok(identity) => identity,
        Err(e) => error!("{}", e),
    };

    match app.remove_tracks(&identity, ids).await {
        Ok(()) => success!("Removed {} tracks from the library", ids.len()),
        Err(e) => error!("Failed to remove tracks: {}", e),
    }
}
