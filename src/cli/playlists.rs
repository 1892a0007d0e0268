use tabled::Table;

use crate::{app::App, error, info, utils};

pub async fn playlists(app: &App, identity: Option<String>) {
    let identity = match app.identity(identity) {
        Ok(identity) => identity,
        Err(e) => error!("{}", e),
    };

    let pb = utils::spinner("Looking up getunes playlists...");
    let result = app.getunes_playlists(&identity).await;
    pb.finish_and_clear();

    let playlists = match result {
        Ok(playlists) => playlists,
        Err(e) => error!("Failed to list playlists: {}", e),
    };

    if playlists.is_empty() {
        info!("No getunes playlists yet. Try `getunes recommend --create-playlist`.");
        return;
    }

    println!("{}", Table::new(utils::playlist_rows(&playlists)));
}
