use reqwest::Method;

use crate::{error::FetchError, spotify::SpotifyClient};

/// Maximum number of ids accepted by the saved-tracks endpoints per call.
const SAVED_TRACKS_BATCH: usize = 50;

impl SpotifyClient {
    /// Whether each track is in the user's library, in the order of `ids`.
    pub async fn contains_saved_tracks(
        &self,
        token: &str,
        ids: &[String],
    ) -> Result<Vec<bool>, FetchError> {
        let mut saved = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(SAVED_TRACKS_BATCH) {
            let url = self.endpoint("/me/tracks/contains", &[("ids", chunk.join(","))])?;
            let flags: Vec<bool> = self.get(&url, token).await?;
            saved.extend(flags);
        }

        Ok(saved)
    }

    pub async fn save_tracks(&self, token: &str, ids: &[String]) -> Result<(), FetchError> {
        self.change_saved_tracks(Method::PUT, token, ids).await
    }

    pub async fn remove_tracks(&self, token: &str, ids: &[String]) -> Result<(), FetchError> {
        self.change_saved_tracks(Method::DELETE, token, ids).await
    }

    async fn change_saved_tracks(
        &self,
        method: Method,
        token: &str,
        ids: &[String],
    ) -> Result<(), FetchError> {
        for chunk in ids.chunks(SAVED_TRACKS_BATCH) {
            let url = self.endpoint("/me/tracks", &[("ids", chunk.join(","))])?;
            self.execute(method.clone(), &url, token).await?;
        }
        Ok(())
    }
}
