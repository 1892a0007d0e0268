use serde::{Deserialize, Serialize};
use tabled::Tabled;
use tokio::{sync::oneshot, time::Instant};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// A user known to the service, keyed by identity id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub identity_id: String,
    pub spotify_id: String,
    pub refresh_token: Option<String>,
}

/// A login waiting for its callback. Pending logins are keyed by their
/// `state` nonce.
#[derive(Debug)]
pub struct PendingAuth {
    pub started: Instant,
    /// Told the outcome once the callback has stored the user.
    pub notify: Option<oneshot::Sender<LoginOutcome>>,
}

impl PendingAuth {
    pub fn new(notify: Option<oneshot::Sender<LoginOutcome>>) -> Self {
        Self {
            started: Instant::now(),
            notify,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub identity: String,
    pub new_user: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

/// A track as stored in a library and returned as a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub popularity: u8,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

impl Track {
    pub fn has_artist(&self, artist_id: &str) -> bool {
        self.artists.iter().any(|a| a.id == artist_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongSeed {
    pub song_id: String,
    pub song_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSeed {
    pub album_id: String,
    pub album_name: String,
}

/// The artist, song or album a recommendation request is anchored to.
///
/// Serialized the way the web client sends it: `artistId`/`artistName` plus an
/// optional `song` or `album` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    #[serde(rename_all = "camelCase")]
    Song {
        artist_id: String,
        artist_name: String,
        song: SongSeed,
    },
    #[serde(rename_all = "camelCase")]
    Album {
        artist_id: String,
        artist_name: String,
        album: AlbumSeed,
    },
    #[serde(rename_all = "camelCase")]
    Artist {
        artist_id: String,
        artist_name: String,
    },
}

impl Seed {
    pub fn artist_id(&self) -> &str {
        match self {
            Seed::Song { artist_id, .. }
            | Seed::Album { artist_id, .. }
            | Seed::Artist { artist_id, .. } => artist_id,
        }
    }

    pub fn artist_name(&self) -> &str {
        match self {
            Seed::Song { artist_name, .. }
            | Seed::Album { artist_name, .. }
            | Seed::Artist { artist_name, .. } => artist_name,
        }
    }

    pub fn song_id(&self) -> Option<&str> {
        match self {
            Seed::Song { song, .. } => Some(&song.song_id),
            _ => None,
        }
    }

    /// Full-text query used to find playlists around this seed.
    pub fn search_query(&self) -> String {
        match self {
            Seed::Song {
                artist_name, song, ..
            } => format!("{} {}", artist_name, song.song_name),
            Seed::Album {
                artist_name, album, ..
            } => format!("{} {}", artist_name, album.album_name),
            Seed::Artist { artist_name, .. } => artist_name.clone(),
        }
    }
}

/// Candidate ranking strategy selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Tracks found in playlists that match the seed
    Related,
    /// The seed artist's discography
    Other,
    /// Spotify's own recommendation endpoint
    Spotify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Artist,
    Track,
    Album,
    Playlist,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Artist => "artist",
            SearchType::Track => "track",
            SearchType::Album => "album",
            SearchType::Playlist => "playlist",
        }
    }
}

/// A search result of any type, reduced to what a seed picker needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPlaylist {
    pub playlist: PlaylistRef,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistCount {
    pub id: String,
    pub name: String,
    pub count: usize,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub popularity: u8,
    pub name: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct SearchTableRow {
    pub id: String,
    pub name: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct ArtistCountTableRow {
    pub count: usize,
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryImport {
    pub saved_tracks: usize,
    pub playlists: usize,
    pub playlist_tracks: usize,
}

/// A track from the listening history, with when it was played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedTrack {
    pub track: Track,
    pub played_at: String,
}

/// An artist with the details returned by the top-artists listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: u8,
}

/// Period over which Spotify computes a user's top items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// About the last four weeks
    ShortTerm,
    /// About the last six months
    #[default]
    MediumTerm,
    /// Several years of history
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorites {
    pub top_tracks: Vec<Track>,
    pub top_artists: Vec<Artist>,
}

/// A playlist created by getunes together with its current tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetunesPlaylist {
    #[serde(flatten)]
    pub playlist: PlaylistRef,
    pub tracks: Vec<Track>,
}

#[derive(Tabled)]
pub struct PlayedTableRow {
    pub played_at: String,
    pub name: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub popularity: u8,
    pub name: String,
    pub genres: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub tracks: usize,
    pub uri: String,
}

#[derive(Tabled)]
pub struct SavedTableRow {
    pub id: String,
    pub saved: bool,
}
