use getunes::api::PlaylistRequest;
use getunes::spotify::auth::is_expired;
use getunes::spotify::models::{Paging, PlaylistSearchResponse, TrackItem, TracksResponse};
use getunes::types::{Method, PlaylistRef, Seed, Token};
use serde_json::json;

#[test]
fn test_seed_song() {
    let seed: Seed = serde_json::from_value(json!({
        "artistId": "a1",
        "artistName": "Artist",
        "song": { "songId": "s1", "songName": "Song" }
    }))
    .unwrap();

    assert!(matches!(seed, Seed::Song { .. }));
    assert_eq!(seed.artist_id(), "a1");
    assert_eq!(seed.song_id(), Some("s1"));
    assert_eq!(seed.search_query(), "Artist Song");
}

#[test]
fn test_seed_album() {
    let seed: Seed = serde_json::from_value(json!({
        "artistId": "a1",
        "artistName": "Artist",
        "album": { "albumId": "al1", "albumName": "Record" }
    }))
    .unwrap();

    assert!(matches!(seed, Seed::Album { .. }));
    assert_eq!(seed.song_id(), None);
    assert_eq!(seed.search_query(), "Artist Record");
}

#[test]
fn test_seed_artist_only() {
    let seed: Seed = serde_json::from_value(json!({
        "artistId": "a1",
        "artistName": "Artist",
        "song": null
    }))
    .unwrap();

    assert!(matches!(seed, Seed::Artist { .. }));
    assert_eq!(seed.artist_name(), "Artist");
    assert_eq!(seed.search_query(), "Artist");
}

#[test]
fn test_seed_without_artist_is_rejected() {
    let result = serde_json::from_value::<Seed>(json!({ "artistName": "Artist" }));
    assert!(result.is_err());
}

#[test]
fn test_playlist_request() {
    let req: PlaylistRequest = serde_json::from_value(json!({
        "identityId": "alice",
        "method": "other",
        "seed": { "artistId": "a1", "artistName": "Artist" }
    }))
    .unwrap();

    assert_eq!(req.identity_id.as_deref(), Some("alice"));
    assert_eq!(req.method, Method::Other);
    assert_eq!(req.num, 20);

    let unknown = serde_json::from_value::<PlaylistRequest>(json!({
        "method": "shuffle",
        "seed": { "artistId": "a1", "artistName": "Artist" }
    }));
    assert!(unknown.is_err());
}

#[test]
fn test_playlist_items_skip_missing_tracks() {
    let page: Paging<TrackItem> = serde_json::from_value(json!({
        "items": [
            { "track": {
                "id": "t1",
                "name": "One",
                "popularity": 55,
                "artists": [{ "id": "a1", "name": "Artist" }, { "id": null, "name": "Local" }]
            } },
            { "track": null },
            null,
            { "track": { "id": null, "name": "Local file" } }
        ],
        "next": "https://api.spotify.com/v1/playlists/p/tracks?offset=100",
        "total": 4
    }))
    .unwrap();

    assert_eq!(page.total, Some(4));
    assert!(page.next.is_some());

    let tracks: Vec<_> = page
        .into_items()
        .into_iter()
        .filter_map(|item| item.track.and_then(|t| t.into_track()))
        .collect();

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].uri, "spotify:track:t1");
    assert_eq!(tracks[0].popularity, 55);
    assert_eq!(tracks[0].artists.len(), 1);
}

#[test]
fn test_tracks_response_keeps_positions() {
    let res: TracksResponse = serde_json::from_value(json!({
        "tracks": [{ "id": "t1", "name": "One" }, null]
    }))
    .unwrap();

    assert_eq!(res.tracks.len(), 2);
    assert!(res.tracks[1].is_none());
}

#[test]
fn test_playlist_search_response() {
    let res: PlaylistSearchResponse = serde_json::from_value(json!({
        "playlists": {
            "items": [
                { "id": "p1", "name": "Mix", "uri": "spotify:playlist:p1", "owner": { "id": "u1" } },
                null
            ],
            "next": null
        }
    }))
    .unwrap();

    let playlists: Vec<PlaylistRef> = res
        .playlists
        .into_items()
        .into_iter()
        .map(PlaylistRef::from)
        .collect();
    assert_eq!(playlists.len(), 1);
    assert_eq!(playlists[0].owner_id.as_deref(), Some("u1"));
}

#[test]
fn test_token_expiry_keeps_a_margin() {
    let token = Token {
        access_token: "access".into(),
        refresh_token: "refresh".into(),
        scope: String::new(),
        expires_in: 3600,
        obtained_at: 1_000,
    };

    assert!(!is_expired(&token, 1_000));
    assert!(!is_expired(&token, 1_000 + 3600 - 241));
    assert!(is_expired(&token, 1_000 + 3600 - 240));
    assert!(is_expired(&token, 1_000 + 7200));
}
