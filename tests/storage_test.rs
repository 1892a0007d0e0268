use getunes::error::StorageError;
use getunes::management::{FileLibraryStore, FileUserStore, LibraryStore, UserStore, validate_key};
use getunes::types::{ArtistRef, Track, User};
use tempfile::TempDir;

fn create_test_track(id: &str, name: &str) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        uri: format!("spotify:track:{}", id),
        popularity: 42,
        artists: vec![ArtistRef {
            id: "artist".to_string(),
            name: "Artist".to_string(),
        }],
    }
}

#[test]
fn test_validate_key() {
    assert!(validate_key("eu-west-1:1234-abcd").is_ok());
    assert!(validate_key("spotify_user.42").is_ok());

    for bad in ["", ".", "..", "a/b", "..\\x", "line\nbreak"] {
        assert!(
            matches!(validate_key(bad), Err(StorageError::InvalidKey(_))),
            "{:?} should be rejected",
            bad
        );
    }
}

#[tokio::test]
async fn test_user_store_roundtrip() {
    let dir = TempDir::new().unwrap();
    let store = FileUserStore::new(dir.path());

    assert!(store.get_user("alice").await.unwrap().is_none());

    let user = User {
        identity_id: "alice".to_string(),
        spotify_id: "alice-spotify".to_string(),
        refresh_token: Some("refresh".to_string()),
    };
    store.put_user(&user).await.unwrap();

    let stored = store.get_user("alice").await.unwrap().unwrap();
    assert_eq!(stored.spotify_id, "alice-spotify");
    assert_eq!(stored.refresh_token.as_deref(), Some("refresh"));
    assert!(dir.path().join("users").join("alice.json").is_file());
}

#[tokio::test]
async fn test_user_store_rejects_unsafe_identity() {
    let dir = TempDir::new().unwrap();
    let store = FileUserStore::new(dir.path());

    let result = store.get_user("../escape").await;
    assert!(matches!(result, Err(StorageError::InvalidKey(_))));
}

#[tokio::test]
async fn test_missing_library_reads_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileLibraryStore::new(dir.path());

    assert!(store.read_library("bob").await.unwrap().is_empty());
    assert!(store.read_known_playlist_ids("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_library_concatenates_all_sources_in_order() {
    let dir = TempDir::new().unwrap();
    let store = FileLibraryStore::new(dir.path());

    store
        .write_saved_tracks("bob", &[create_test_track("saved", "Saved")])
        .await
        .unwrap();
    store
        .write_playlist_tracks("bob", &[create_test_track("listed", "Listed")])
        .await
        .unwrap();
    store
        .append_recommended("bob", &[create_test_track("rec1", "Rec One")])
        .await
        .unwrap();
    store
        .append_recommended("bob", &[create_test_track("rec2", "Rec Two")])
        .await
        .unwrap();

    let library = store.read_library("bob").await.unwrap();
    let ids: Vec<&str> = library.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["saved", "listed", "rec1", "rec2"]);

    let bob = dir.path().join("bob");
    assert!(bob.join("library").join("tracks.json").is_file());
    assert!(bob.join("library").join("playlist-tracks.json").is_file());
    assert!(bob.join("recommended").join("playlist-tracks.json").is_file());
}

#[tokio::test]
async fn test_import_overwrites_but_history_is_kept() {
    let dir = TempDir::new().unwrap();
    let store = FileLibraryStore::new(dir.path());

    store
        .append_recommended("bob", &[create_test_track("rec", "Rec")])
        .await
        .unwrap();
    store
        .write_saved_tracks("bob", &[create_test_track("old", "Old")])
        .await
        .unwrap();
    store
        .write_saved_tracks("bob", &[create_test_track("new", "New")])
        .await
        .unwrap();

    let library = store.read_library("bob").await.unwrap();
    let ids: Vec<&str> = library.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "rec"]);
}

#[tokio::test]
async fn test_playlist_ids_append_or_create() {
    let dir = TempDir::new().unwrap();
    let store = FileLibraryStore::new(dir.path());

    store.add_playlist_id("bob", "p1").await.unwrap();
    store.add_playlist_id("bob", "p2").await.unwrap();

    assert_eq!(
        store.read_known_playlist_ids("bob").await.unwrap(),
        vec!["p1".to_string(), "p2".to_string()]
    );
    assert!(store.read_known_playlist_ids("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_library_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let library_dir = dir.path().join("bob").join("library");
    std::fs::create_dir_all(&library_dir).unwrap();
    std::fs::write(library_dir.join("tracks.json"), "not json").unwrap();

    let store = FileLibraryStore::new(dir.path());
    let result = store.read_library("bob").await;
    assert!(matches!(result, Err(StorageError::Serde(_))));
}
