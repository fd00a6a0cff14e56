//! OneClick Player - Playback Control
//!
//! Turns a "play this playlist" trigger into a single-track playback request
//! on the streaming service.
//!
//! This crate provides:
//! - Lazy, cached track lists per playlist (fetched once, on first press)
//! - A cursor per playlist that advances one track per successful press
//! - Explicit policies for switching playlists and for running off the end
//!
//! # Architecture
//!
//! `oneclick-playback` knows nothing about buttons or lamps. The streaming
//! service is reached through the `PlaybackSource` trait from
//! `oneclick-core`, so the controller is exercised in tests with a mock.
//!
//! # Example
//!
//! ```rust,no_run
//! use oneclick_core::{DeviceId, PlaybackSource, PlaylistId};
//! use oneclick_playback::{PlaybackConfig, PlaybackController, TriggerOutcome};
//! use std::sync::Arc;
//!
//! # async fn run(source: Arc<dyn PlaybackSource>) -> oneclick_playback::Result<()> {
//! let mut controller =
//!     PlaybackController::new(source, DeviceId::new("kitchen"), PlaybackConfig::default());
//!
//! let playlist = PlaylistId::new("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M");
//! match controller.trigger(&playlist).await? {
//!     TriggerOutcome::Started { track, .. } => println!("playing {track}"),
//!     TriggerOutcome::Exhausted { .. } => println!("nothing left to play"),
//! }
//! # Ok(())
//! # }
//! ```

mod controller;
mod error;
mod playlist;
pub mod types;

// Public exports
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use playlist::PlaylistState;
pub use types::{EndPolicy, PlaybackConfig, SwitchPolicy, TriggerOutcome};
