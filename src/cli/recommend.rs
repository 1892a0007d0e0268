use tabled::Table;

use crate::{
    app::App,
    error, info, success,
    types::{Method, Seed},
    utils,
};

pub async fn recommend(
    app: &App,
    identity: Option<String>,
    method: Method,
    seed: Seed,
    num: usize,
    create_playlist: bool,
) {
    let identity = match app.identity(identity) {
        Ok(identity) => identity,
        Err(e) => error!("{}", e),
    };

    let pb = utils::spinner(format!(
        "Looking for tracks around {}...",
        seed.search_query()
    ));

    let tracks = if create_playlist {
        match app.create_playlist(&identity, method, &seed, num).await {
            Ok(created) => {
                pb.finish_and_clear();
                success!(
                    "Created playlist \"{}\" ({})",
                    created.playlist.name,
                    created.playlist.uri
                );
                created.tracks
            }
            Err(e) => {
                pb.finish_and_clear();
                error!("Failed to create playlist: {}", e);
            }
        }
    } else {
        match app.engine.recommend(&identity, method, &seed, num).await {
            Ok(tracks) => {
                pb.finish_and_clear();
                tracks
            }
            Err(e) => {
                pb.finish_and_clear();
                error!("Failed to recommend tracks: {}", e);
            }
        }
    };

    if tracks.is_empty() {
        info!("Nothing new found for {}", seed.artist_name());
        return;
    }

    println!("{}", Table::new(utils::track_rows(&tracks)));
}
