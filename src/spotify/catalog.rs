use async_trait::async_trait;

use crate::{
    error::FetchError,
    spotify::{
        SpotifyClient,
        models::{
            Paging, PlaylistSearchResponse, TrackItem, TracksResponse, WireAlbum, WireSearchItem,
            WireTrack,
        },
    },
    types::{AlbumRef, PlaylistRef, SearchHit, SearchType, Track},
};

/// Read-only view of the music catalog the recommendation engine draws from.
///
/// Every method takes the caller's bearer token; list endpoints are drained
/// completely before returning.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search_playlists(
        &self,
        token: &str,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<PlaylistRef>, FetchError>;

    async fn search(
        &self,
        token: &str,
        query: &str,
        kind: SearchType,
        limit: u32,
    ) -> Result<Vec<SearchHit>, FetchError>;

    async fn playlist_tracks(&self, token: &str, playlist_id: &str)
    -> Result<Vec<Track>, FetchError>;

    /// Albums, singles, compilations and guest appearances of an artist.
    async fn artist_albums(&self, token: &str, artist_id: &str)
    -> Result<Vec<AlbumRef>, FetchError>;

    /// Album tracks as listed on the album; popularity is not populated.
    async fn album_tracks(&self, token: &str, album_id: &str) -> Result<Vec<Track>, FetchError>;

    /// Full track details for at most 50 ids. Unavailable tracks come back as `None`.
    async fn tracks_by_ids(
        &self,
        token: &str,
        ids: &[String],
    ) -> Result<Vec<Option<Track>>, FetchError>;

    async fn recommendations(
        &self,
        token: &str,
        artist_id: &str,
        track_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Track>, FetchError>;
}

/// Search terms are lowercased and suffixed with a wildcard.
fn search_term(query: &str) -> String {
    format!("{}*", query.trim().to_lowercase())
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn search_playlists(
        &self,
        token: &str,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<PlaylistRef>, FetchError> {
        let url = self.endpoint(
            "/search",
            &[
                ("q", search_term(query)),
                ("type", "playlist".to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ],
        )?;

        let response: PlaylistSearchResponse = self.get(&url, token).await?;
        Ok(response
            .playlists
            .into_items()
            .into_iter()
            .map(PlaylistRef::from)
            .collect())
    }

    async fn search(
        &self,
        token: &str,
        query: &str,
        kind: SearchType,
        limit: u32,
    ) -> Result<Vec<SearchHit>, FetchError> {
        let url = self.endpoint(
            "/search",
            &[
                ("q", search_term(query)),
                ("type", kind.as_str().to_string()),
                ("limit", limit.to_string()),
            ],
        )?;

        let mut response: serde_json::Value = self.get(&url, token).await?;
        let key = format!("{}s", kind.as_str());
        let Some(paging) = response.get_mut(&key).map(serde_json::Value::take) else {
            return Ok(Vec::new());
        };
        let paging: Paging<WireSearchItem> =
            serde_json::from_value(paging).map_err(|e| FetchError::Parse {
                url: url.clone(),
                message: e.to_string(),
            })?;

        Ok(paging
            .into_items()
            .into_iter()
            .filter_map(|item| item.into_hit())
            .collect())
    }

    async fn playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
    ) -> Result<Vec<Track>, FetchError> {
        let url = self.endpoint(
            &format!("/playlists/{}/tracks", playlist_id),
            &[("limit", "100".to_string())],
        )?;

        let items: Vec<TrackItem> = self.get_all(&url, token).await?;
        Ok(items
            .into_iter()
            .filter_map(|item| item.track.and_then(WireTrack::into_track))
            .collect())
    }

    async fn artist_albums(
        &self,
        token: &str,
        artist_id: &str,
    ) -> Result<Vec<AlbumRef>, FetchError> {
        let url = self.endpoint(
            &format!("/artists/{}/albums", artist_id),
            &[
                (
                    "include_groups",
                    "album,single,compilation,appears_on".to_string(),
                ),
                ("limit", "50".to_string()),
            ],
        )?;

        let albums: Vec<WireAlbum> = self.get_all(&url, token).await?;
        Ok(albums.into_iter().filter_map(WireAlbum::into_album).collect())
    }

    async fn album_tracks(&self, token: &str, album_id: &str) -> Result<Vec<Track>, FetchError> {
        let url = self.endpoint(
            &format!("/albums/{}/tracks", album_id),
            &[("limit", "50".to_string())],
        )?;

        let tracks: Vec<WireTrack> = self.get_all(&url, token).await?;
        Ok(tracks.into_iter().filter_map(WireTrack::into_track).collect())
    }

    async fn tracks_by_ids(
        &self,
        token: &str,
        ids: &[String],
    ) -> Result<Vec<Option<Track>>, FetchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.endpoint("/tracks", &[("ids", ids.join(","))])?;
        let response: TracksResponse = self.get(&url, token).await?;
        Ok(response
            .tracks
            .into_iter()
            .map(|t| t.and_then(WireTrack::into_track))
            .collect())
    }

    async fn recommendations(
        &self,
        token: &str,
        artist_id: &str,
        track_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Track>, FetchError> {
        let mut params = vec![
            ("limit", limit.to_string()),
            ("seed_artists", artist_id.to_string()),
        ];
        if let Some(track_id) = track_id {
            params.push(("seed_tracks", track_id.to_string()));
        }

        let url = self.endpoint("/recommendations", &params)?;
        let response: TracksResponse = self.get(&url, token).await?;
        Ok(response
            .tracks
            .into_iter()
            .flatten()
            .filter_map(WireTrack::into_track)
            .collect())
    }
}
