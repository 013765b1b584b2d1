use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Local};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::{
    error::UserInputError,
    types::{PlaylistRef, PlaylistTableRow, TrackRecord, TrackTableRow},
};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Parses a 1-based menu selection into a 0-based index below `len`.
pub fn parse_selection(input: &str, len: usize) -> Result<usize, UserInputError> {
    let invalid = || UserInputError::InvalidSelection(input.trim().to_string());
    let choice: usize = input.trim().parse().map_err(|_| invalid())?;
    if choice == 0 || choice > len {
        return Err(invalid());
    }
    Ok(choice - 1)
}

/// Shortens an ISO-8601 `added_at` to its date part for display.
pub fn format_added_date(added_at: &str) -> String {
    match DateTime::parse_from_rfc3339(added_at) {
        Ok(dt) => dt.format("%Y-%m-%d").to_string(),
        Err(_) => added_at.chars().take(10).collect(),
    }
}

pub fn backup_file_name(now: DateTime<Local>) -> String {
    format!("liked_songs_backup_{}.json", now.format("%Y%m%d_%H%M%S"))
}

pub fn track_table_rows(tracks: &[TrackRecord]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(idx, t)| TrackTableRow {
            position: idx + 1,
            name: t.name.clone(),
            artists: t.artists.clone(),
            added: format_added_date(&t.added_at),
        })
        .collect()
}

pub fn playlist_table_rows(playlists: &[PlaylistRef]) -> Vec<PlaylistTableRow> {
    playlists
        .iter()
        .enumerate()
        .map(|(idx, p)| PlaylistTableRow {
            position: idx + 1,
            name: p.name.clone(),
            tracks: p
                .total_tracks
                .map(|t| t.to_string())
                .unwrap_or_else(|| "?".to_string()),
            editable: if p.editable { "yes" } else { "no" }.to_string(),
        })
        .collect()
}
