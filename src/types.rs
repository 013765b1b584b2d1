use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Seconds before `expires_at` at which a token is no longer handed out.
pub const EXPIRY_MARGIN_SECS: i64 = 30;

/// The persisted authentication state.
///
/// `expires_at` is absolute so a record loaded later needs no re-basing
/// against the clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Builds a record from a token endpoint response received at `now`.
    ///
    /// The service does not always rotate refresh tokens; when the response
    /// carries none, `previous_refresh` is kept.
    pub fn from_response(
        response: TokenResponse,
        now: DateTime<Utc>,
        previous_refresh: Option<String>,
    ) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at: now + Duration::seconds(response.expires_in),
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// JSON body of the token endpoint for both grant types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_expires_in() -> i64 {
    3600
}

/// A track normalized from a liked-songs or playlist listing.
///
/// `uri` is the identity used for deduplication, `added_at` drives the
/// chronological ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub name: String,
    pub uri: String,
    pub artists: String,
    pub added_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
    /// Owned by the current user or collaborative.
    pub editable: bool,
    pub total_tracks: Option<u64>,
}

/// One page of an offset-paginated listing.
///
/// The service occasionally returns `null` in place of an entry, so items
/// are optional and callers skip the holes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<Option<T>>,
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Item of `/me/tracks` and `/playlists/{id}/tracks`.
///
/// `track` is null for tracks the service withdrew.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrackItem {
    #[serde(default)]
    pub added_at: Option<String>,
    #[serde(default)]
    pub track: Option<ApiTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTrack {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub artists: Vec<ApiArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiArtist {
    pub name: String,
}

impl SavedTrackItem {
    /// Normalizes the item, or `None` when it carries no usable track.
    pub fn into_record(self) -> Option<TrackRecord> {
        let track = self.track?;
        let uri = track.uri.filter(|uri| !uri.is_empty())?;

        Some(TrackRecord {
            name: track.name.unwrap_or_default(),
            uri,
            artists: track
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<&str>>()
                .join(", "),
            added_at: self.added_at.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiPlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub collaborative: bool,
    pub owner: ApiOwner,
    #[serde(default)]
    pub tracks: Option<PlaylistTracksRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiOwner {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u64,
}

impl ApiPlaylist {
    pub fn into_ref(self, user_id: &str) -> PlaylistRef {
        PlaylistRef {
            editable: self.collaborative || self.owner.id == user_id,
            id: self.id,
            name: self.name,
            total_tracks: self.tracks.map(|t| t.total),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl CurrentUser {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub name: String,
    pub artists: String,
    pub added: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub name: String,
    pub tracks: String,
    pub editable: String,
}
