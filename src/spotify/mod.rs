//! # Spotify Integration Module
//!
//! Everything that talks to Spotify: the accounts service for tokens and the
//! Web API for the user's library.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer
//!     ↓
//! Spotify Integration Layer
//!     ├── auth      (token lifecycle, authorization-code + refresh grants)
//!     ├── tracks    (paginated liked / playlist track fetch)
//!     ├── playlist  (playlist listing, batched writes)
//!     └── client    (LibraryApi trait, reqwest implementation)
//!     ↓
//! Spotify Web API
//! ```
//!
//! ## Authentication Strategy
//!
//! [`auth::TokenManager`] hands out an access token however it has to be
//! obtained. A stored token is reused while it is valid for at least another
//! 30 seconds; after that the refresh token is exchanged silently. Only when
//! neither works does it fall back to the browser: the local callback server
//! is started, the consent page opened, and the redirect polled once a
//! second for up to two minutes. The code exchange always carries a PKCE
//! verifier; a configured client secret is sent as HTTP basic auth on top.
//!
//! ## Pagination and Partial Results
//!
//! Listings are offset paginated. A page that fails does not abort the run:
//! the fetch returns what it collected together with a
//! [`crate::error::FetchError::PartialResult`], and the caller decides how
//! far to trust the lower bound.
//!
//! ## Rate Limiting
//!
//! The reqwest client sleeps through `429 Too Many Requests` when the
//! `Retry-After` header asks for at most 120 seconds, and retries `502 Bad
//! Gateway` after 10 seconds, both a bounded number of times.
//!
//! ## API Coverage
//!
//! - `GET /me` - current user
//! - `GET /me/playlists` - the user's playlists
//! - `GET /me/tracks` - liked tracks
//! - `GET /playlists/{id}/tracks` - playlist tracks
//! - `POST /playlists/{id}/tracks` - append up to 100 URIs
//! - `POST /api/token` - authorization-code and refresh-token grants

pub mod auth;
pub mod client;
pub mod playlist;
pub mod tracks;
