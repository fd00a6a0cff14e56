//! OneClick Player Core
//!
//! Platform-agnostic types, collaborator traits, and error handling shared by
//! every OneClick Player crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `PlaylistId`, `TrackUri`, `DeviceId`, `LampId`, `Level`
//! - **Collaborator Traits**: `PlaybackSource` (the streaming service) and
//!   `IndicatorDriver` (the lamp bank)
//! - **Error Handling**: Unified `OneClickError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use oneclick_core::types::{LampId, Level, PlaylistId, TrackUri};
//!
//! let playlist = PlaylistId::new("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M");
//! let track = TrackUri::new("spotify:track:4uLU6hMCjMI75M1A2tKUQC");
//! let lamp = LampId::new(17);
//!
//! assert_eq!(playlist.as_str(), "spotify:playlist:37i9dQZF1DXcBWIGoYBM5M");
//! assert!(track.as_str().starts_with("spotify:track:"));
//! assert_eq!(Level::Active.toggled(), Level::Inactive);
//! assert_eq!(lamp.pin(), 17);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{OneClickError, Result};
pub use traits::{IndicatorDriver, PlaybackSource};
pub use types::{DeviceId, LampId, Level, PlaylistId, TrackUri};
