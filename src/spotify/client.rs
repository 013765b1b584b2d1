use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config::Config,
    error::ApiError,
    spotify::auth::TokenManager,
    types::{AddTrackToPlaylistRequest, ApiPlaylist, CurrentUser, Page, SavedTrackItem},
    warning,
};

/// Attempts per request when the service asks to retry.
const MAX_ATTEMPTS: u32 = 3;

/// Longest `Retry-After` the client is willing to sleep through.
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Pause before a request that failed with `502 Bad Gateway` is repeated.
pub const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);

/// A paginated track collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSource {
    /// The user's saved ("liked") tracks.
    Liked,
    /// The tracks of the playlist with this id.
    Playlist(String),
}

impl TrackSource {
    pub fn path(&self) -> String {
        match self {
            TrackSource::Liked => "/me/tracks".to_string(),
            TrackSource::Playlist(id) => format!("/playlists/{}/tracks", id),
        }
    }
}

/// The subset of the Spotify Web API the merger consumes.
#[async_trait]
pub trait LibraryApi: Send + Sync {
    async fn current_user(&self) -> Result<CurrentUser, ApiError>;

    async fn playlists_page(&self, offset: u32, limit: u32) -> Result<Page<ApiPlaylist>, ApiError>;

    async fn tracks_page(
        &self,
        source: &TrackSource,
        offset: u32,
        limit: u32,
    ) -> Result<Page<SavedTrackItem>, ApiError>;

    /// Appends at most 100 URIs, in order, to the end of the playlist.
    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), ApiError>;
}

/// [`LibraryApi`] over HTTPS with a bearer token.
///
/// The token is not fixed at construction. Every request asks the
/// [`TokenManager`] for a valid access token, so a long interactive session
/// keeps working after the first token expires: the stored token is
/// refreshed silently, and a token obtained by re-authorizing is picked up
/// on the next request.
///
/// # Rate Limiting
///
/// - `429 Too Many Requests`: sleeps for `Retry-After` seconds when the
///   header asks for at most 120 seconds, otherwise gives up with a warning
/// - `502 Bad Gateway`: waits [`BAD_GATEWAY_DELAY`] and tries again
///
/// Both retries share a budget of three attempts per request.
///
/// # Example
///
/// ```
/// let manager = Arc::new(TokenManager::new(store, grant));
/// let client = SpotifyClient::new(&config, Arc::clone(&manager));
/// let user = client.current_user().await?;
/// ```
pub struct SpotifyClient {
    client: Client,
    api_url: String,
    tokens: Arc<TokenManager>,
    bad_gateway_delay: Duration,
}

impl SpotifyClient {
    pub fn new(config: &Config, tokens: Arc<TokenManager>) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            tokens,
            bad_gateway_delay: BAD_GATEWAY_DELAY,
        }
    }

    pub fn with_bad_gateway_delay(mut self, delay: Duration) -> Self {
        self.bad_gateway_delay = delay;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Sends the request built by `build` with a current bearer token.
    ///
    /// `build` is called once per attempt because a `RequestBuilder` cannot
    /// be sent twice.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Auth`] when no valid token can be obtained without
    ///   opening the browser
    /// - [`ApiError::Status`] for any non-success status left after retries
    /// - [`ApiError::Transport`] when the request could not be sent
    async fn send(&self, build: impl Fn() -> RequestBuilder) -> Result<Response, ApiError> {
        let mut attempt = 1;
        loop {
            let token = self.tokens.get_valid_access_token(false).await?;
            let response = build().bearer_auth(token).send().await?;
            let status = response.status();

            if attempt < MAX_ATTEMPTS {
                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(1);
                    if retry_after <= MAX_RETRY_AFTER_SECS {
                        sleep(Duration::from_secs(retry_after)).await;
                        attempt += 1;
                        continue;
                    }
                    warning!(
                        "Rate limited for {} seconds, not waiting that long.",
                        retry_after
                    );
                } else if status == StatusCode::BAD_GATEWAY {
                    sleep(self.bad_gateway_delay).await;
                    attempt += 1;
                    continue;
                }
            }

            if !status.is_success() {
                return Err(ApiError::Status(status.as_u16()));
            }
            return Ok(response);
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, u32)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self.send(|| self.client.get(&url).query(query)).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl LibraryApi for SpotifyClient {
    async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        self.get_json("/me", &[]).await
    }

    async fn playlists_page(&self, offset: u32, limit: u32) -> Result<Page<ApiPlaylist>, ApiError> {
        self.get_json("/me/playlists", &[("offset", offset), ("limit", limit)])
            .await
    }

    async fn tracks_page(
        &self,
        source: &TrackSource,
        offset: u32,
        limit: u32,
    ) -> Result<Page<SavedTrackItem>, ApiError> {
        self.get_json(&source.path(), &[("offset", offset), ("limit", limit)])
            .await
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), ApiError> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };
        self.send(|| self.client.post(&url).json(&body)).await?;
        Ok(())
    }
}
