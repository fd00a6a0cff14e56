/// Per-line edge debouncing
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Rejects edges that follow the last accepted edge on the same line within
/// the window. Lines are independent.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_accepted: HashMap<u8, Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether an edge on `line` at `at` counts as a press
    pub fn accept(&mut self, line: u8, at: Instant) -> bool {
        if let Some(last) = self.last_accepted.get(&line) {
            if at.saturating_duration_since(*last) < self.window {
                return false;
            }
        }
        self.last_accepted.insert(line, at);
        true
    }
}
