#![allow(dead_code)]

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use likesync::{
    error::{ApiError, AuthError},
    spotify::{
        auth::TokenGrant,
        client::{LibraryApi, TrackSource},
    },
    types::{
        ApiArtist, ApiOwner, ApiPlaylist, ApiTrack, CurrentUser, Page, PlaylistTracksRef,
        SavedTrackItem, TokenResponse, TrackRecord,
    },
};

pub type PageResult<T> = Result<Page<T>, u16>;

pub fn track(uri: &str, added_at: &str) -> TrackRecord {
    TrackRecord {
        name: format!("Song {}", uri),
        uri: uri.to_string(),
        artists: "Some Artist".to_string(),
        added_at: added_at.to_string(),
    }
}

pub fn item(uri: &str, added_at: &str) -> SavedTrackItem {
    SavedTrackItem {
        added_at: Some(added_at.to_string()),
        track: Some(ApiTrack {
            name: Some(format!("Song {}", uri)),
            uri: Some(uri.to_string()),
            artists: vec![
                ApiArtist {
                    name: "First".to_string(),
                },
                ApiArtist {
                    name: "Second".to_string(),
                },
            ],
        }),
    }
}

pub fn withdrawn_item(added_at: &str) -> SavedTrackItem {
    SavedTrackItem {
        added_at: Some(added_at.to_string()),
        track: None,
    }
}

pub fn page<T>(items: Vec<T>, has_next: bool) -> Page<T> {
    Page {
        items: items.into_iter().map(Some).collect(),
        next: has_next.then(|| "https://api.example/next".to_string()),
        total: None,
    }
}

/// A full page of `size` distinct items whose URIs start with `prefix`.
pub fn full_page(prefix: &str, size: usize, has_next: bool) -> Page<SavedTrackItem> {
    let items = (0..size)
        .map(|i| item(&format!("{}:{}", prefix, i), "2024-01-01T00:00:00Z"))
        .collect();
    page(items, has_next)
}

pub fn playlist(id: &str, owner: &str, collaborative: bool) -> ApiPlaylist {
    ApiPlaylist {
        id: id.to_string(),
        name: format!("Playlist {}", id),
        collaborative,
        owner: ApiOwner {
            id: owner.to_string(),
        },
        tracks: Some(PlaylistTracksRef { total: 3 }),
    }
}

/// In-memory stand-in for the Web API.
///
/// Pages are served by `offset / limit`; a page index beyond the list is
/// answered with 404.
#[derive(Default)]
pub struct MockApi {
    pub liked_pages: Vec<PageResult<SavedTrackItem>>,
    pub playlist_pages: Vec<PageResult<SavedTrackItem>>,
    pub playlists: Vec<PageResult<ApiPlaylist>>,
    /// Zero-based add call that fails, with its status.
    pub fail_add_at: Option<(usize, u16)>,
    pub add_calls: Mutex<Vec<(String, Vec<String>)>>,
    pub page_requests: Mutex<Vec<(TrackSource, u32, u32)>>,
}

impl MockApi {
    pub fn add_calls(&self) -> Vec<(String, Vec<String>)> {
        self.add_calls.lock().unwrap().clone()
    }

    pub fn page_requests(&self) -> Vec<(TrackSource, u32, u32)> {
        self.page_requests.lock().unwrap().clone()
    }
}

fn serve<T: Clone>(pages: &[PageResult<T>], offset: u32, limit: u32) -> Result<Page<T>, ApiError> {
    let index = (offset / limit) as usize;
    match pages.get(index) {
        Some(Ok(page)) => Ok(page.clone()),
        Some(Err(status)) => Err(ApiError::Status(*status)),
        None => Err(ApiError::Status(404)),
    }
}

#[async_trait]
impl LibraryApi for MockApi {
    async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        Ok(CurrentUser {
            id: "me".to_string(),
            display_name: Some("Me".to_string()),
        })
    }

    async fn playlists_page(&self, offset: u32, limit: u32) -> Result<Page<ApiPlaylist>, ApiError> {
        serve(&self.playlists, offset, limit)
    }

    async fn tracks_page(
        &self,
        source: &TrackSource,
        offset: u32,
        limit: u32,
    ) -> Result<Page<SavedTrackItem>, ApiError> {
        self.page_requests
            .lock()
            .unwrap()
            .push((source.clone(), offset, limit));

        match source {
            TrackSource::Liked => serve(&self.liked_pages, offset, limit),
            TrackSource::Playlist(_) => serve(&self.playlist_pages, offset, limit),
        }
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), ApiError> {
        let mut calls = self.add_calls.lock().unwrap();
        if let Some((fail_at, status)) = self.fail_add_at {
            if calls.len() == fail_at {
                return Err(ApiError::Status(status));
            }
        }
        calls.push((playlist_id.to_string(), uris.to_vec()));
        Ok(())
    }
}

/// Token endpoint that records calls and answers from canned responses.
#[derive(Default)]
pub struct MockGrant {
    pub refresh_response: Option<TokenResponse>,
    pub refresh_status: Option<u16>,
    pub exchange_response: Option<TokenResponse>,
    pub exchange_status: Option<u16>,
    pub refresh_calls: AtomicUsize,
    pub exchanged: Mutex<Vec<(String, String)>>,
}

impl MockGrant {
    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn exchanged(&self) -> Vec<(String, String)> {
        self.exchanged.lock().unwrap().clone()
    }
}

pub fn token_response(access: &str, refresh: Option<&str>) -> TokenResponse {
    TokenResponse {
        access_token: access.to_string(),
        expires_in: 3600,
        refresh_token: refresh.map(str::to_string),
        scope: None,
    }
}

#[async_trait]
impl TokenGrant for MockGrant {
    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
    ) -> Result<TokenResponse, AuthError> {
        self.exchanged
            .lock()
            .unwrap()
            .push((code.to_string(), verifier.to_string()));

        if let Some(status) = self.exchange_status {
            return Err(AuthError::ExchangeFailed(status));
        }
        self.exchange_response
            .clone()
            .ok_or(AuthError::ExchangeFailed(500))
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<TokenResponse, AuthError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(status) = self.refresh_status {
            return Err(AuthError::ExchangeFailed(status));
        }
        self.refresh_response
            .clone()
            .ok_or(AuthError::ExchangeFailed(500))
    }
}
