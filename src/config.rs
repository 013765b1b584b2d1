//! Configuration management for the liked songs merger.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (everything except the client id)

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

use crate::error::ConfigError;

pub const DEFAULT_SERVER_ADDRESS: ([u8; 4], u16) = ([127, 0, 0, 1], 8888);
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/callback";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str = "playlist-read-private playlist-read-collaborative playlist-modify-private playlist-modify-public user-library-read";

/// Directory under the platform data dir that holds `.env` and `token.json`.
pub const APP_DIR: &str = "likesync";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The directory is created when missing so users know where to put the
/// file. A missing `.env` is not an error: every setting can also come from
/// the process environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/likesync/.env`
/// - macOS: `~/Library/Application Support/likesync/.env`
/// - Windows: `%LOCALAPPDATA%/likesync/.env`
///
/// # Errors
///
/// Returns the error message if:
/// - The data directory cannot be created
/// - The `.env` file exists but cannot be read or parsed
///
/// # Example
///
/// ```
/// if let Err(e) = config::load_env().await {
///     error!("Cannot load environment. Err: {}", e);
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Platform-specific directory for persisted application state.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub client_id: String,
    /// When set, the token endpoint is called with HTTP basic client
    /// authentication in addition to the PKCE verifier.
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub server_address: SocketAddr,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Variables
    ///
    /// - `SPOTIFY_API_AUTH_CLIENT_ID` (required)
    /// - `SPOTIFY_API_AUTH_CLIENT_SECRET`
    /// - `SPOTIFY_API_REDIRECT_URI`
    /// - `SERVER_ADDRESS`
    /// - `SPOTIFY_API_AUTH_SCOPE`
    /// - `SPOTIFY_API_AUTH_URL`
    /// - `SPOTIFY_API_TOKEN_URL`
    /// - `SPOTIFY_API_URL`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    ///
    /// # Arguments
    ///
    /// * `lookup` - returns the raw value of a variable, `None` when unset
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] when `SPOTIFY_API_AUTH_CLIENT_ID` is unset
    /// - [`ConfigError::Invalid`] when `SERVER_ADDRESS` is not a socket
    ///   address such as `127.0.0.1:8888`
    ///
    /// # Example
    ///
    /// ```
    /// let config = Config::from_lookup(|key| match key {
    ///     "SPOTIFY_API_AUTH_CLIENT_ID" => Some("my-client-id".to_string()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(config.server_address.port(), 8888);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = get("SPOTIFY_API_AUTH_CLIENT_ID")
            .ok_or(ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_ID"))?;

        let server_address = match get("SERVER_ADDRESS") {
            Some(raw) => SocketAddr::from_str(&raw).map_err(|_| ConfigError::Invalid {
                key: "SERVER_ADDRESS",
                value: raw,
            })?,
            None => SocketAddr::from(DEFAULT_SERVER_ADDRESS),
        };

        Ok(Self {
            client_id,
            client_secret: get("SPOTIFY_API_AUTH_CLIENT_SECRET"),
            redirect_uri: get("SPOTIFY_API_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            server_address,
            scope: get("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}
