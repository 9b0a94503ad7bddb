//! # API Module
//!
//! HTTP endpoints of the local listener.
//!
//! - [`callback`] - completes the OAuth 2.0 PKCE login by exchanging the
//!   authorization code for a token.
//! - [`health`] - status and version for quick checks.
//! - [`playlist`] - accepts a JSON ranking request
//!   (`{playlistName, features, combinator?, createPlaylist?}`) and runs the
//!   ranking pipeline. Answers 201 on success, 400 for invalid requests and
//!   404 for unknown playlists.

mod callback;
mod health;
mod playlist;

pub use callback::callback;
pub use health::health;
pub use playlist::{ApiError, CatalogSource, RankResponse, playlist};
