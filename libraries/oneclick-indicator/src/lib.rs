//! OneClick Player - LED Progress Indicator
//!
//! Drives an ordered bank of lamps as a progress bar while a track plays:
//! each lamp blinks for a fixed time, then stays lit while the next one
//! blinks.
//!
//! ```text
//! lamp 0: _-_-_-_-_-----------------------
//! lamp 1: ________________ _-_-_-_-_------
//! lamp 2: ________________________ _-_-_-_
//! ```
//!
//! A new button press preempts the running session. The [`Indicator`]
//! launcher guarantees that at most one [`SessionReport`]-producing task
//! writes to the lamps at any instant:
//!
//! 1. cancel the active session's token
//! 2. wait (bounded) for its acknowledgement, sent after all lamps are off
//! 3. sleep a short grace period
//! 4. spawn the replacement, which takes over the single session slot
//!
//! A session checks its token before every lamp write and while waiting
//! between writes, so preemption latency is bounded by one half-toggle
//! interval.

mod error;
mod indicator;
mod pattern;
mod session;
mod slot;

pub use error::{IndicatorError, Result};
pub use indicator::{Activity, Indicator};
pub use pattern::{BlinkPattern, PreemptionTiming};
pub use session::{SessionId, SessionReport, SessionState};
