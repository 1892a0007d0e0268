use crate::{
    error::FetchError,
    spotify::{
        SpotifyClient,
        models::{
            Paging, PlayHistoryItem, TrackItem, WireFullArtist, WirePlaylist, WireProfile,
            WireTrack,
        },
    },
    types::{Artist, PlayedTrack, PlaylistRef, TimeRange, Track, UserProfile},
};

impl SpotifyClient {
    pub async fn current_user(&self, token: &str) -> Result<UserProfile, FetchError> {
        let url = self.endpoint("/me", &[])?;
        let profile: WireProfile = self.get(&url, token).await?;
        Ok(profile.into())
    }

    /// Playlists in the user's library that the user owns.
    pub async fn my_playlists(
        &self,
        token: &str,
        user_id: &str,
    ) -> Result<Vec<PlaylistRef>, FetchError> {
        let url = self.endpoint("/me/playlists", &[("limit", "50".to_string())])?;
        let playlists: Vec<WirePlaylist> = self.get_all(&url, token).await?;

        Ok(playlists
            .into_iter()
            .map(PlaylistRef::from)
            .filter(|p| p.owner_id.as_deref() == Some(user_id))
            .collect())
    }

    pub async fn saved_tracks(&self, token: &str) -> Result<Vec<Track>, FetchError> {
        let url = self.endpoint("/me/tracks", &[("limit", "50".to_string())])?;
        let items: Vec<TrackItem> = self.get_all(&url, token).await?;

        Ok(items
            .into_iter()
            .filter_map(|item| item.track.and_then(WireTrack::into_track))
            .collect())
    }

    /// The last 50 tracks the user played, most recent first.
    pub async fn recently_played(&self, token: &str) -> Result<Vec<PlayedTrack>, FetchError> {
        let url = self.endpoint("/me/player/recently-played", &[("limit", "50".to_string())])?;
        let page: Paging<PlayHistoryItem> = self.get(&url, token).await?;

        Ok(page
            .into_items()
            .into_iter()
            .filter_map(PlayHistoryItem::into_played)
            .collect())
    }

    pub async fn my_top_tracks(
        &self,
        token: &str,
        range: TimeRange,
    ) -> Result<Vec<Track>, FetchError> {
        let url = self.top_url("tracks", range)?;
        let tracks: Vec<WireTrack> = self.get_all(&url, token).await?;
        Ok(tracks.into_iter().filter_map(WireTrack::into_track).collect())
    }

    pub async fn my_top_artists(
        &self,
        token: &str,
        range: TimeRange,
    ) -> Result<Vec<Artist>, FetchError> {
        let url = self.top_url("artists", range)?;
        let artists: Vec<WireFullArtist> = self.get_all(&url, token).await?;
        Ok(artists
            .into_iter()
            .filter_map(WireFullArtist::into_artist)
            .collect())
    }

    fn top_url(&self, kind: &str, range: TimeRange) -> Result<String, FetchError> {
        self.endpoint(
            &format!("/me/top/{}", kind),
            &[
                ("time_range", range.as_str().to_string()),
                ("limit", "50".to_string()),
            ],
        )
    }
}
