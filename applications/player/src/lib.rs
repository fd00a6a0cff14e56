//! OneClick Player
//!
//! Physical buttons start Spotify playlists on a fixed speaker, one track
//! per press; a row of LEDs shows a progress bar that restarts with every
//! press.
//!
//! ```text
//! GPIO edge ──► mpsc ──► Dispatcher ──► PlaybackController ──► Spotify
//!  (interrupt    (unbounded)  │ debounce
//!   thread)                   └──────► Indicator ──► lamps
//! ```
//!
//! The binary (`oneclick`) wires these together; the library half exists so
//! the dispatcher can be exercised without hardware.

pub mod config;
pub mod debounce;
pub mod dispatcher;
pub mod error;
#[cfg(target_os = "linux")]
pub mod gpio;
pub mod simulate;
pub mod startup;

pub use crate::config::{ButtonBinding, Settings, SpeakerSettings, SpotifySettings};
pub use debounce::Debouncer;
pub use dispatcher::{ButtonEvent, Dispatch, Dispatcher, EventSender};
pub use error::{AppError, Result};
