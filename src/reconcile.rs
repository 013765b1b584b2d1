//! Missing-track computation and commit ordering.
//!
//! The engine is pure: it never talks to the remote service. Given the liked
//! tracks (oldest first) and the tracks already in the target playlist it
//! returns the tracks to append, newest first. The URI is the only identity:
//! two recordings with the same title and artists but different URIs are
//! different tracks.

use std::collections::HashSet;

use crate::types::TrackRecord;

/// Sorts tracks ascending by `added_at`.
///
/// The sort is stable, so tracks with equal timestamps keep the order the
/// fetch produced them in.
pub fn sort_oldest_first(tracks: &mut [TrackRecord]) {
    tracks.sort_by(|a, b| a.added_at.cmp(&b.added_at));
}

/// Returns `liked \ target` in reverse input order.
///
/// `liked` must already be oldest first (see [`sort_oldest_first`]); the
/// result is then newest first.
pub fn reconcile(liked: &[TrackRecord], target: &[TrackRecord]) -> Vec<TrackRecord> {
    let target_uris: HashSet<&str> = target.iter().map(|t| t.uri.as_str()).collect();

    let mut missing: Vec<TrackRecord> = liked
        .iter()
        .filter(|t| !target_uris.contains(t.uri.as_str()))
        .cloned()
        .collect();

    missing.reverse();
    missing
}

pub fn uris(tracks: &[TrackRecord]) -> Vec<String> {
    tracks.iter().map(|t| t.uri.clone()).collect()
}
