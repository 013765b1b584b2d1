mod common;

use common::track;
use likesync::{
    reconcile::{reconcile, sort_oldest_first, uris},
    types::TrackRecord,
};

fn uri_list(tracks: &[TrackRecord]) -> Vec<&str> {
    tracks.iter().map(|t| t.uri.as_str()).collect()
}

#[test]
fn test_disjoint_sets_return_reversed_liked() {
    let liked = vec![
        track("a", "2024-01-01"),
        track("b", "2024-02-01"),
        track("c", "2024-03-01"),
    ];
    let target = vec![track("x", "2023-01-01"), track("y", "2023-02-01")];

    let mut expected = liked.clone();
    expected.reverse();

    assert_eq!(reconcile(&liked, &target), expected);
}

#[test]
fn test_full_overlap_is_empty() {
    let liked = vec![track("a", "2024-01-01"), track("b", "2024-02-01")];

    assert!(reconcile(&liked, &liked).is_empty());
}

#[test]
fn test_second_pass_after_commit_is_empty() {
    let liked = vec![
        track("a", "2024-01-01"),
        track("b", "2024-02-01"),
        track("c", "2024-03-01"),
    ];
    let target = vec![track("a", "2024-01-01")];

    let missing = reconcile(&liked, &target);
    let mut merged = target.clone();
    merged.extend(missing);

    assert!(reconcile(&liked, &merged).is_empty());
}

#[test]
fn test_single_missing_track() {
    let liked = vec![track("a", "2024-01-01"), track("b", "2024-02-01")];
    let target = vec![track("a", "2024-01-01")];

    assert_eq!(uri_list(&reconcile(&liked, &target)), vec!["b"]);
}

#[test]
fn test_missing_tracks_newest_first() {
    let liked = vec![
        track("a", "2024-01-01"),
        track("b", "2024-02-01"),
        track("c", "2024-03-01"),
    ];
    let target = vec![track("a", "2024-01-01")];

    assert_eq!(uri_list(&reconcile(&liked, &target)), vec!["c", "b"]);
}

#[test]
fn test_uri_is_the_only_identity() {
    let mut same_song = track("b", "2024-02-01");
    same_song.name = "Song a".to_string();
    let liked = vec![track("a", "2024-01-01"), same_song];
    let target = vec![track("a", "2024-01-01")];

    // Same name and artists as "a" but a different URI: still missing.
    assert_eq!(uri_list(&reconcile(&liked, &target)), vec!["b"]);
}

#[test]
fn test_target_only_tracks_are_ignored() {
    let liked = vec![track("a", "2024-01-01")];
    let target = vec![track("z", "2024-01-01"), track("a", "2024-01-01")];

    assert!(reconcile(&liked, &target).is_empty());
}

#[test]
fn test_empty_inputs() {
    let liked = vec![track("a", "2024-01-01")];

    assert!(reconcile(&[], &liked).is_empty());
    assert_eq!(uri_list(&reconcile(&liked, &[])), vec!["a"]);
}

#[test]
fn test_sort_oldest_first_orders_by_added_at() {
    let mut tracks = vec![
        track("c", "2024-03-01T10:00:00Z"),
        track("a", "2024-01-01T10:00:00Z"),
        track("b", "2024-02-01T10:00:00Z"),
    ];

    sort_oldest_first(&mut tracks);

    assert_eq!(uri_list(&tracks), vec!["a", "b", "c"]);
}

#[test]
fn test_equal_timestamps_keep_fetch_order() {
    let mut liked = vec![
        track("late", "2024-05-01T00:00:00Z"),
        track("first", "2024-01-01T00:00:00Z"),
        track("second", "2024-01-01T00:00:00Z"),
        track("third", "2024-01-01T00:00:00Z"),
    ];

    sort_oldest_first(&mut liked);
    assert_eq!(uri_list(&liked), vec!["first", "second", "third", "late"]);

    // Reversal is the only reordering: ties come out in reverse fetch order.
    assert_eq!(
        uri_list(&reconcile(&liked, &[])),
        vec!["late", "third", "second", "first"]
    );
}

#[test]
fn test_uris_keeps_order() {
    let tracks = vec![track("c", "2024-03-01"), track("b", "2024-02-01")];

    assert_eq!(uris(&tracks), vec!["c".to_string(), "b".to_string()]);
}
