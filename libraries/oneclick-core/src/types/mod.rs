//! Domain types for OneClick Player

mod ids;
mod lamp;

pub use ids::{DeviceId, PlaylistId, TrackUri};
pub use lamp::{LampId, Level};
