mod common;

use common::{MockApi, full_page, item, page, playlist, withdrawn_item};
use likesync::{
    error::FetchError,
    spotify::{
        client::TrackSource,
        playlist::fetch_playlists,
        tracks::{LIKED_PAGE_SIZE, PLAYLIST_PAGE_SIZE, fetch_tracks},
    },
    types::{ApiPlaylist, ApiTrack, Page, SavedTrackItem},
};

#[tokio::test]
async fn test_fetch_follows_pages_until_no_next() {
    let api = MockApi {
        liked_pages: vec![
            Ok(full_page("p1", 50, true)),
            Ok(full_page("p2", 50, true)),
            Ok(page(vec![item("last", "2024-06-01T00:00:00Z")], false)),
        ],
        ..Default::default()
    };

    let fetched = fetch_tracks(&api, &TrackSource::Liked, LIKED_PAGE_SIZE, None).await;

    assert!(fetched.is_complete());
    assert_eq!(fetched.items.len(), 101);
    assert_eq!(fetched.items[0].uri, "p1:0");
    assert_eq!(fetched.items[100].uri, "last");

    let offsets: Vec<u32> = api.page_requests().iter().map(|r| r.1).collect();
    assert_eq!(offsets, vec![0, 50, 100]);
    assert!(api.page_requests().iter().all(|r| r.2 == 50));
}

#[tokio::test]
async fn test_fetch_normalizes_records() {
    let api = MockApi {
        liked_pages: vec![Ok(page(vec![item("spotify:track:1", "2024-01-02T03:04:05Z")], false))],
        ..Default::default()
    };

    let fetched = fetch_tracks(&api, &TrackSource::Liked, LIKED_PAGE_SIZE, None).await;
    let track = &fetched.items[0];

    assert_eq!(track.uri, "spotify:track:1");
    assert_eq!(track.name, "Song spotify:track:1");
    assert_eq!(track.artists, "First, Second");
    assert_eq!(track.added_at, "2024-01-02T03:04:05Z");
}

#[tokio::test]
async fn test_fetch_skips_malformed_items() {
    let missing_uri = SavedTrackItem {
        added_at: Some("2024-01-01T00:00:00Z".to_string()),
        track: Some(ApiTrack {
            name: Some("Local ghost".to_string()),
            uri: None,
            artists: vec![],
        }),
    };
    let api = MockApi {
        liked_pages: vec![
            Ok(page(
                vec![
                    item("a", "2024-01-01T00:00:00Z"),
                    withdrawn_item("2024-01-02T00:00:00Z"),
                    missing_uri,
                ],
                true,
            )),
            Ok(page(vec![item("b", "2024-01-03T00:00:00Z")], false)),
        ],
        ..Default::default()
    };

    let fetched = fetch_tracks(&api, &TrackSource::Liked, LIKED_PAGE_SIZE, None).await;

    assert!(fetched.is_complete());
    let uris: Vec<&str> = fetched.items.iter().map(|t| t.uri.as_str()).collect();
    assert_eq!(uris, vec!["a", "b"]);
}

#[tokio::test]
async fn test_server_error_returns_partial_result() {
    let api = MockApi {
        playlist_pages: vec![
            Ok(full_page("p1", 100, true)),
            Ok(full_page("p2", 100, true)),
            Err(500),
            Ok(full_page("p4", 100, false)),
        ],
        ..Default::default()
    };

    let fetched = fetch_tracks(
        &api,
        &TrackSource::Playlist("target".to_string()),
        PLAYLIST_PAGE_SIZE,
        None,
    )
    .await;

    assert_eq!(fetched.items.len(), 200);
    assert_eq!(fetched.items[199].uri, "p2:99");
    match fetched.partial {
        Some(FetchError::PartialResult { collected, cause }) => {
            assert_eq!(collected, 200);
            assert!(matches!(*cause, FetchError::EndpointFailure(500)));
        }
        other => panic!("expected a partial result, got {:?}", other),
    }
    assert_eq!(api.page_requests().len(), 3);
}

#[tokio::test]
async fn test_null_entries_are_skipped_without_stopping() {
    let mut first = page(vec![item("a", "2024-01-01T00:00:00Z")], true);
    first.items.push(None);
    let api = MockApi {
        liked_pages: vec![
            Ok(first),
            Ok(page(vec![item("b", "2024-01-02T00:00:00Z")], false)),
        ],
        ..Default::default()
    };

    let fetched = fetch_tracks(&api, &TrackSource::Liked, LIKED_PAGE_SIZE, None).await;

    assert!(fetched.is_complete());
    let uris: Vec<&str> = fetched.items.iter().map(|t| t.uri.as_str()).collect();
    assert_eq!(uris, vec!["a", "b"]);
}

#[test]
fn test_track_page_with_null_entry_deserializes() {
    let json = r#"{
        "items": [
            {"added_at": "2024-01-01T00:00:00Z",
             "track": {"name": "A", "uri": "spotify:track:a", "artists": [{"name": "X"}]}},
            null
        ],
        "next": null
    }"#;

    let page: Page<SavedTrackItem> = serde_json::from_str(json).unwrap();

    assert_eq!(page.items.len(), 2);
    let record = page.items.into_iter().flatten().next().unwrap().into_record();
    assert_eq!(record.unwrap().uri, "spotify:track:a");
}

#[tokio::test]
async fn test_playlist_page_with_null_entry_keeps_valid_playlists() {
    let json = r#"{
        "items": [
            null,
            {"id": "p1", "name": "Mine", "collaborative": false,
             "owner": {"id": "me"}, "tracks": {"total": 4}}
        ],
        "next": null,
        "total": 2
    }"#;
    let parsed: Page<ApiPlaylist> = serde_json::from_str(json).unwrap();
    let api = MockApi {
        playlists: vec![Ok(parsed)],
        ..Default::default()
    };

    let fetched = fetch_playlists(&api, "me").await;

    assert!(fetched.is_complete());
    assert_eq!(fetched.items.len(), 1);
    assert_eq!(fetched.items[0].id, "p1");
    assert!(fetched.items[0].editable);
}

#[tokio::test]
async fn test_first_page_failure_is_empty_partial() {
    let api = MockApi {
        liked_pages: vec![Err(401)],
        ..Default::default()
    };

    let fetched = fetch_tracks(&api, &TrackSource::Liked, LIKED_PAGE_SIZE, None).await;

    assert!(fetched.items.is_empty());
    assert!(!fetched.is_complete());
}

#[tokio::test]
async fn test_empty_page_with_next_stops() {
    let api = MockApi {
        liked_pages: vec![Ok(page(vec![], true))],
        ..Default::default()
    };

    let fetched = fetch_tracks(&api, &TrackSource::Liked, LIKED_PAGE_SIZE, None).await;

    assert!(fetched.is_complete());
    assert!(fetched.items.is_empty());
    assert_eq!(api.page_requests().len(), 1);
}

#[tokio::test]
async fn test_playlists_derive_editable() {
    let api = MockApi {
        playlists: vec![
            Ok(page(
                vec![
                    playlist("mine", "me", false),
                    playlist("shared", "friend", true),
                ],
                true,
            )),
            Ok(page(vec![playlist("theirs", "friend", false)], false)),
        ],
        ..Default::default()
    };

    let fetched = fetch_playlists(&api, "me").await;

    assert!(fetched.is_complete());
    let flags: Vec<(&str, bool)> = fetched
        .items
        .iter()
        .map(|p| (p.id.as_str(), p.editable))
        .collect();
    assert_eq!(
        flags,
        vec![("mine", true), ("shared", true), ("theirs", false)]
    );
    assert_eq!(fetched.items[0].total_tracks, Some(3));
}

#[tokio::test]
async fn test_playlists_partial_on_failure() {
    let api = MockApi {
        playlists: vec![Ok(page(vec![playlist("mine", "me", false)], true)), Err(503)],
        ..Default::default()
    };

    let fetched = fetch_playlists(&api, "me").await;

    assert_eq!(fetched.items.len(), 1);
    assert!(matches!(
        fetched.partial,
        Some(FetchError::PartialResult { collected: 1, .. })
    ));
}
