//! Blink pattern and preemption timing

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing of one indicator session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkPattern {
    /// Delay between session start and the first lamp write (default: 1s)
    pub start_delay: Duration,

    /// Time a lamp holds each level while blinking (default: 500ms)
    pub half_toggle: Duration,

    /// Off/on cycles per lamp before it holds and the next lamp starts (default: 30)
    pub toggles_per_lamp: u32,
}

impl BlinkPattern {
    /// Time one lamp spends blinking
    pub fn lamp_duration(&self) -> Duration {
        self.half_toggle * self.toggles_per_lamp.saturating_mul(2)
    }

    /// Time an uninterrupted session takes for `lamps` lamps
    pub fn session_duration(&self, lamps: usize) -> Duration {
        self.start_delay + self.lamp_duration() * lamps as u32
    }
}

impl Default for BlinkPattern {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_secs(1),
            half_toggle: Duration::from_millis(500),
            toggles_per_lamp: 30,
        }
    }
}

/// Bounds of the preemption handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreemptionTiming {
    /// Longest wait for the old session's acknowledgement (default: 2s)
    pub ack_timeout: Duration,

    /// Pause after the old session is gone, before the new one starts (default: 100ms)
    pub grace: Duration,
}

impl Default for PreemptionTiming {
    fn default() -> Self {
        Self {
            ack_timeout: Duration::from_secs(2),
            grace: Duration::from_millis(100),
        }
    }
}
