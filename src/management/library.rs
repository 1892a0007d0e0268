use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    error::StorageError,
    management::storage::{read_json, validate_key, write_json},
    types::Track,
};

const SAVED_TRACKS: &str = "library/tracks.json";
const PLAYLIST_TRACKS: &str = "library/playlist-tracks.json";
const RECOMMENDED_TRACKS: &str = "recommended/playlist-tracks.json";
const PLAYLIST_IDS: &str = "playlists.json";

/// Per-identity listening history and Getunes playlist bookkeeping.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Saved tracks, playlist tracks and previously recommended tracks, in
    /// that order. Duplicates are kept.
    async fn read_library(&self, identity: &str) -> Result<Vec<Track>, StorageError>;

    /// Ids of the playlists created for this identity.
    async fn read_known_playlist_ids(&self, identity: &str) -> Result<Vec<String>, StorageError>;

    async fn append_recommended(&self, identity: &str, tracks: &[Track])
    -> Result<(), StorageError>;

    async fn add_playlist_id(&self, identity: &str, playlist_id: &str) -> Result<(), StorageError>;

    async fn write_saved_tracks(&self, identity: &str, tracks: &[Track])
    -> Result<(), StorageError>;

    async fn write_playlist_tracks(
        &self,
        identity: &str,
        tracks: &[Track],
    ) -> Result<(), StorageError>;
}

/// Keeps JSON documents under `<root>/<identity>/`, mirroring the object
/// keys of the hosted service.
pub struct FileLibraryStore {
    root: PathBuf,
}

impl FileLibraryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, identity: &str, name: &str) -> Result<PathBuf, StorageError> {
        let mut path = self.root.clone();
        path.push(validate_key(identity)?);
        path.push(name);
        Ok(path)
    }

    async fn read_tracks(&self, identity: &str, name: &str) -> Result<Vec<Track>, StorageError> {
        Ok(read_json(&self.path(identity, name)?)
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl LibraryStore for FileLibraryStore {
    async fn read_library(&self, identity: &str) -> Result<Vec<Track>, StorageError> {
        let mut library = self.read_tracks(identity, SAVED_TRACKS).await?;
        library.extend(self.read_tracks(identity, PLAYLIST_TRACKS).await?);
        library.extend(self.read_tracks(identity, RECOMMENDED_TRACKS).await?);

        debug!(identity, tracks = library.len(), "library read");
        Ok(library)
    }

    async fn read_known_playlist_ids(&self, identity: &str) -> Result<Vec<String>, StorageError> {
        Ok(read_json(&self.path(identity, PLAYLIST_IDS)?)
            .await?
            .unwrap_or_default())
    }

    async fn append_recommended(
        &self,
        identity: &str,
        tracks: &[Track],
    ) -> Result<(), StorageError> {
        let mut recommended = self.read_tracks(identity, RECOMMENDED_TRACKS).await?;
        recommended.extend_from_slice(tracks);
        write_json(&self.path(identity, RECOMMENDED_TRACKS)?, &recommended).await
    }

    async fn add_playlist_id(&self, identity: &str, playlist_id: &str) -> Result<(), StorageError> {
        let mut ids = self.read_known_playlist_ids(identity).await?;
        ids.push(playlist_id.to_string());
        write_json(&self.path(identity, PLAYLIST_IDS)?, &ids).await
    }

    async fn write_saved_tracks(
        &self,
        identity: &str,
        tracks: &[Track],
    ) -> Result<(), StorageError> {
        write_json(&self.path(identity, SAVED_TRACKS)?, tracks).await
    }

    async fn write_playlist_tracks(
        &self,
        identity: &str,
        tracks: &[Track],
    ) -> Result<(), StorageError> {
        write_json(&self.path(identity, PLAYLIST_TRACKS)?, tracks).await
    }
}
