//! Shared test helpers: a lamp driver that records every write

use oneclick_core::{IndicatorDriver, LampId, Level, OneClickError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Write {
    pub at: Instant,
    pub lamp: LampId,
    pub level: Level,
}

#[derive(Default)]
struct Inner {
    configured: Mutex<Vec<LampId>>,
    writes: Mutex<Vec<Write>>,
    failing_activations: AtomicUsize,
}

/// Lamp driver double; clones share one write log
#[derive(Clone, Default)]
pub struct RecordingDriver {
    inner: Arc<Inner>,
}

impl RecordingDriver {
    /// Fail the next `n` writes that would light a lamp
    pub fn fail_next_activations(&self, n: usize) {
        self.inner.failing_activations.store(n, Ordering::SeqCst);
    }

    pub fn configured(&self) -> Vec<LampId> {
        self.inner.configured.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.inner.writes.lock().unwrap().clone()
    }

    /// Level of every lamp after replaying `writes`
    pub fn levels_after(writes: &[Write]) -> HashMap<LampId, Level> {
        let mut levels = HashMap::new();
        for write in writes {
            levels.insert(write.lamp, write.level);
        }
        levels
    }

    /// Whether every lamp ever written is currently inactive
    pub fn all_dark(&self) -> bool {
        Self::levels_after(&self.writes())
            .values()
            .all(|level| *level == Level::Inactive)
    }
}

impl IndicatorDriver for RecordingDriver {
    fn configure_output(&self, lamp: LampId) -> oneclick_core::Result<()> {
        self.inner.configured.lock().unwrap().push(lamp);
        Ok(())
    }

    fn set_lamp(&self, lamp: LampId, level: Level) -> oneclick_core::Result<()> {
        if level == Level::Active {
            let failing = &self.inner.failing_activations;
            if failing
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(OneClickError::hardware(lamp, "simulated write failure"));
            }
        }
        self.inner.writes.lock().unwrap().push(Write {
            at: Instant::now(),
            lamp,
            level,
        });
        Ok(())
    }
}

pub fn lamps(n: u8) -> Vec<LampId> {
    (0..n).map(|i| LampId::new(5 + i)).collect()
}
