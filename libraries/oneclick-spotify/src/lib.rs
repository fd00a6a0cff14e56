//! OneClick Spotify Client
//!
//! Spotify Web API client used as OneClick Player's playback source.
//!
//! # Features
//!
//! - **Authorization**: authorization-code flow without a browser, with a
//!   JSON token cache that is refreshed shortly before expiry
//! - **Devices**: list Connect devices, match one by name prefix
//! - **Playback**: set volume, start a single track
//! - **Playlists**: fetch every track URI, following pagination
//!
//! `SpotifyClient` implements `oneclick_core::PlaybackSource`.
//!
//! # Example
//!
//! ```ignore
//! use oneclick_spotify::{SpotifyClient, SpotifyConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SpotifyConfig::new("client-id", "client-secret", "http://localhost:8888/callback")
//!         .with_token_cache(".cache-default");
//!     let client = SpotifyClient::new(config)?;
//!
//!     for device in client.devices().await? {
//!         println!("{} ({})", device.name, device.kind);
//!     }
//!     Ok(())
//! }
//! ```

mod auth;
mod cache;
mod client;
mod error;
mod player;
mod playlists;
mod source;
mod types;

pub use auth::{code_from_redirect, AuthClient};
pub use cache::TokenCache;
pub use client::SpotifyClient;
pub use error::{Result, SpotifyError};
pub use player::PlayerClient;
pub use playlists::{playlist_id, PlaylistClient};
pub use types::{Device, SpotifyConfig, TokenInfo, EXPIRY_MARGIN_SECS};
