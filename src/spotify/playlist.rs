use reqwest::Method;

use crate::{
    error::FetchError,
    spotify::{
        SpotifyClient,
        models::{AddTracksRequest, CreatePlaylistRequest, SnapshotResponse, WirePlaylist},
    },
    types::PlaylistRef,
};

/// Maximum number of URIs accepted by a single add-tracks call.
const ADD_TRACKS_BATCH: usize = 100;

impl SpotifyClient {
    /// Creates a private playlist owned by `user_id`.
    pub async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<PlaylistRef, FetchError> {
        let url = self.endpoint(&format!("/users/{}/playlists", user_id), &[])?;
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
        };

        let playlist: WirePlaylist = self.send(Method::POST, &url, token, &body).await?;
        Ok(playlist.into())
    }

    /// Appends tracks to a playlist, in order, batching the URIs.
    pub async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<Option<String>, FetchError> {
        let url = self.endpoint(&format!("/playlists/{}/tracks", playlist_id), &[])?;
        let mut snapshot = None;

        for chunk in uris.chunks(ADD_TRACKS_BATCH) {
            let body = AddTracksRequest {
                uris: chunk.to_vec(),
            };
            let response: SnapshotResponse = self.send(Method::POST, &url, token, &body).await?;
            snapshot = response.snapshot_id;
        }

        Ok(snapshot)
    }
}
