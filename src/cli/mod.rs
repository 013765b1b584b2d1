//! # CLI Module
//!
//! User-facing commands of likesync. Each command wires the configuration to
//! a [`crate::spotify::auth::TokenManager`] and a
//! [`crate::spotify::client::SpotifyClient`], then delegates to the core
//! pipeline while handling prompts, spinners and tables.
//!
//! ## Commands
//!
//! - [`auth`] - run the browser authorization and store the token
//! - [`merge`] - add missing liked songs to a playlist, newest first
//! - [`menu`] - interactive loop over all operations
//! - [`backup`] - write a JSON snapshot of the liked songs
//! - [`liked`] - list liked songs
//! - [`playlists`] - list the user's playlists
//!
//! ## Error Handling
//!
//! Authentication failures end the process with exit code 1 through the
//! `error!` macro. Partial fetches and failed writes are reported with
//! `warning!` and the command returns normally. Invalid menu input is
//! answered with a new prompt.

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::Config,
    error,
    management::FileTokenStore,
    server::CallbackServer,
    spotify::{
        auth::{InteractiveAuth, SpotifyTokenGrant, TokenManager},
        client::SpotifyClient,
        tracks::Fetched,
    },
    warning,
};

mod auth;
mod backup;
mod liked;
mod menu;
mod merge;
mod playlists;

pub use auth::auth;
pub use backup::backup;
pub use liked::liked;
pub use menu::menu;
pub use merge::{merge, merge_with};
pub use playlists::playlists;

/// Token manager over the per-user token file and the local callback server.
pub(crate) fn token_manager(config: &Config) -> Arc<TokenManager> {
    let server = Arc::new(CallbackServer::new(config.server_address));

    Arc::new(
        TokenManager::new(
            Arc::new(FileTokenStore::default_location()),
            Arc::new(SpotifyTokenGrant::new(config)),
        )
        .with_interactive(InteractiveAuth::new(config, server)),
    )
}

/// Makes sure a token exists (authorizing in the browser if needed) and
/// returns an API client that keeps asking `manager` for fresh tokens.
/// Exits the process when no token can be obtained.
pub(crate) async fn connect(config: &Config, manager: &Arc<TokenManager>) -> SpotifyClient {
    if let Err(e) = manager.get_valid_access_token(true).await {
        error!("Authentication failed: {}", e);
    }
    SpotifyClient::new(config, Arc::clone(manager))
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    if crate::is_quiet() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

pub(crate) fn report_partial<T>(what: &str, fetched: &Fetched<T>) {
    if let Some(e) = &fetched.partial {
        warning!("Could not fetch all {}: {}", what, e);
    }
}

/// Reads one line from the terminal, `None` when no terminal is attached.
pub(crate) fn prompt(text: &str) -> Option<String> {
    dialoguer::Input::<String>::new()
        .with_prompt(text)
        .allow_empty(true)
        .interact_text()
        .ok()
}

pub(crate) fn confirm(text: &str) -> bool {
    dialoguer::Confirm::new()
        .with_prompt(text)
        .default(false)
        .interact()
        .unwrap_or(false)
}
