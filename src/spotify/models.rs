//! Wire shapes of the Spotify Web API responses used here.
//!
//! The API returns `null` for unavailable tracks, local files without ids and
//! deleted playlists in search results, so ids and list entries are optional
//! on the wire and filtered while converting to the domain types.

use serde::{Deserialize, Serialize};

use crate::types::{
    AlbumRef, Artist, ArtistRef, PlayedTrack, PlaylistRef, SearchHit, Track, UserProfile,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<Option<T>>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

impl<T> Paging<T> {
    pub fn into_items(self) -> Vec<T> {
        self.items.into_iter().flatten().collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireArtist {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireTrack {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub uri: Option<String>,
    pub popularity: Option<u8>,
    #[serde(default)]
    pub artists: Vec<WireArtist>,
}

impl WireTrack {
    pub fn into_track(self) -> Option<Track> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(Track {
            uri: self.uri.unwrap_or_else(|| format!("spotify:track:{}", id)),
            id,
            name: self.name,
            popularity: self.popularity.unwrap_or(0),
            artists: self
                .artists
                .into_iter()
                .filter_map(|a| {
                    a.id.map(|id| ArtistRef {
                        id,
                        name: a.name,
                    })
                })
                .collect(),
        })
    }
}

/// Entry of a playlist or saved-tracks listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackItem {
    pub track: Option<WireTrack>,
}

/// Entry of the recently-played listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayHistoryItem {
    pub track: Option<WireTrack>,
    #[serde(default)]
    pub played_at: String,
}

impl PlayHistoryItem {
    pub fn into_played(self) -> Option<PlayedTrack> {
        Some(PlayedTrack {
            track: self.track?.into_track()?,
            played_at: self.played_at,
        })
    }
}

/// Artist object as returned by the top-artists listing.
#[derive(Debug, Clone, Deserialize)]
pub struct WireFullArtist {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub popularity: Option<u8>,
}

impl WireFullArtist {
    pub fn into_artist(self) -> Option<Artist> {
        Some(Artist {
            id: self.id.filter(|id| !id.is_empty())?,
            name: self.name,
            genres: self.genres,
            popularity: self.popularity.unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireAlbum {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl WireAlbum {
    pub fn into_album(self) -> Option<AlbumRef> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(AlbumRef {
            id,
            name: self.name,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePlaylist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uri: String,
    pub owner: Option<Owner>,
}

impl From<WirePlaylist> for PlaylistRef {
    fn from(p: WirePlaylist) -> Self {
        PlaylistRef {
            id: p.id,
            name: p.name,
            uri: p.uri,
            owner_id: p.owner.map(|o| o.id),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSearchResponse {
    pub playlists: Paging<WirePlaylist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireSearchItem {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<WireArtist>,
}

impl WireSearchItem {
    pub fn into_hit(self) -> Option<SearchHit> {
        Some(SearchHit {
            id: self.id?,
            name: self.name,
            uri: self.uri,
            artists: self
                .artists
                .into_iter()
                .filter_map(|a| {
                    a.id.map(|id| ArtistRef {
                        id,
                        name: a.name,
                    })
                })
                .collect(),
        })
    }
}

/// Body of `/tracks?ids=` and `/recommendations`.
#[derive(Debug, Clone, Deserialize)]
pub struct TracksResponse {
    #[serde(default)]
    pub tracks: Vec<Option<WireTrack>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireProfile {
    pub id: String,
    pub display_name: Option<String>,
}

impl From<WireProfile> for UserProfile {
    fn from(p: WireProfile) -> Self {
        UserProfile {
            id: p.id,
            display_name: p.display_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: Option<String>,
}
