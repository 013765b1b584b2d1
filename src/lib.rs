//! Spotify Liked Songs Merger Library
//!
//! This library merges the tracks a user has "liked" on Spotify into one of
//! their playlists. Missing tracks are appended newest first and never
//! duplicated. It contains the OAuth 2.0 token lifecycle (browser handoff,
//! local callback server, persisted token with silent refresh) and the
//! reconciliation pipeline (paginated fetch, set difference, batched write).
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by all layers
//! - `management` - Token persistence and liked-songs snapshots
//! - `reconcile` - Missing-track computation and commit ordering
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

use std::sync::atomic::{AtomicBool, Ordering};

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod reconcile;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

static QUIET: AtomicBool = AtomicBool::new(false);

/// Switches quiet mode on or off for the whole process.
///
/// In quiet mode `info!` and `success!` print nothing and progress spinners
/// are hidden. Warnings and errors are always printed.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Returns whether quiet mode is active.
pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Prints an informational message with a blue bullet point.
///
/// Suppressed in quiet mode.
///
/// # Example
///
/// ```
/// info!("Fetching your liked songs...");
/// info!("Found {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    if !$crate::is_quiet() {
      println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
    }
  })
}

/// Prints a success message with a green checkmark.
///
/// Suppressed in quiet mode.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// success!("Added {} songs", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    if !$crate::is_quiet() {
      println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
    }
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the process with exit code 1. Only used for failures the run
/// cannot recover from, such as a missing access token.
///
/// # Example
///
/// ```
/// error!("Authentication failed: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues such as partial fetches. Printed even in
/// quiet mode.
///
/// # Example
///
/// ```
/// warning!("Only {} tracks could be fetched", collected);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
