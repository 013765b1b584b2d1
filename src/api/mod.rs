//! # API Module
//!
//! HTTP handlers of the local callback server.
//!
//! The server exposes a single route, `GET /callback`, which the Spotify
//! authorization page redirects the browser to. The handler hands the
//! authorization code to the waiting token manager through the shared cell
//! from [`crate::server`] and answers with a static confirmation page.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use likesync::api::callback;
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .layer(Extension(cell));
//! ```

mod callback;

pub use callback::callback;
