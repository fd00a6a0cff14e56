//! A single indicator session
//!
//! State machine:
//!
//! ```text
//! Idle -> Running -> Completed
//!                 -> Cancelled
//!                 -> Failed
//! ```
//!
//! Every exit path switches all lamps off before the session reports.

use crate::pattern::BlinkPattern;
use oneclick_core::{IndicatorDriver, LampId, Level, OneClickError};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Sequence number of a session, unique per `Indicator`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of an indicator session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not started
    Idle,

    /// Driving the lamps
    Running,

    /// Every lamp cycled
    Completed,

    /// Preempted before finishing
    Cancelled,

    /// A lamp write failed
    Failed,
}

impl SessionState {
    /// Whether the session has ended
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

/// Acknowledgement a session sends when it ends
#[derive(Debug)]
pub struct SessionReport {
    pub id: SessionId,

    /// Terminal state
    pub state: SessionState,

    /// Lamp write failure, for `SessionState::Failed`
    pub error: Option<OneClickError>,

    /// Time from spawn to acknowledgement
    pub elapsed: Duration,
}

/// How the blink loop stopped
enum Exit {
    Finished,
    Interrupted,
}

pub(crate) struct IndicatorSession {
    id: SessionId,
    driver: Arc<dyn IndicatorDriver>,
    lamps: Arc<[LampId]>,
    pattern: BlinkPattern,
    cancel: CancellationToken,
}

impl IndicatorSession {
    pub(crate) fn new(
        id: SessionId,
        driver: Arc<dyn IndicatorDriver>,
        lamps: Arc<[LampId]>,
        pattern: BlinkPattern,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            driver,
            lamps,
            pattern,
            cancel,
        }
    }

    /// Run to a terminal state and build the acknowledgement
    pub(crate) async fn run(self) -> SessionReport {
        let started = Instant::now();
        debug!(session = %self.id, lamps = self.lamps.len(), "Indicator session running");

        let result = self.blink().await;
        let cleanup = switch_off_all(self.driver.as_ref(), &self.lamps);

        let (state, error) = match (result, cleanup) {
            (Err(e), cleanup) => {
                if let Err(cleanup_err) = cleanup {
                    warn!(session = %self.id, error = %cleanup_err, "Lamp cleanup failed");
                }
                (SessionState::Failed, Some(e))
            }
            (Ok(_), Err(e)) => (SessionState::Failed, Some(e)),
            (Ok(Exit::Finished), Ok(())) => (SessionState::Completed, None),
            (Ok(Exit::Interrupted), Ok(())) => (SessionState::Cancelled, None),
        };

        let elapsed = started.elapsed();
        match (&state, &error) {
            (SessionState::Failed, Some(e)) => {
                warn!(session = %self.id, error = %e, "Indicator session failed");
            }
            _ => {
                info!(session = %self.id, state = ?state, elapsed_ms = elapsed.as_millis() as u64, "Indicator session ended");
            }
        }

        SessionReport {
            id: self.id,
            state,
            error,
            elapsed,
        }
    }

    async fn blink(&self) -> Result<Exit, OneClickError> {
        if !self.pause(self.pattern.start_delay).await {
            return Ok(Exit::Interrupted);
        }
        switch_off_all(self.driver.as_ref(), &self.lamps)?;

        for &lamp in self.lamps.iter() {
            for _ in 0..self.pattern.toggles_per_lamp {
                // Ends on Active, so the lamp holds once its blinking is done
                for level in [Level::Inactive, Level::Active] {
                    if self.cancel.is_cancelled() {
                        return Ok(Exit::Interrupted);
                    }
                    self.driver.set_lamp(lamp, level)?;
                    if !self.pause(self.pattern.half_toggle).await {
                        return Ok(Exit::Interrupted);
                    }
                }
            }
        }

        Ok(Exit::Finished)
    }

    /// Sleep for `duration`, returning `false` if cancelled first
    async fn pause(&self, duration: Duration) -> bool {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => false,
            () = tokio::time::sleep(duration) => true,
        }
    }
}

/// Drive every lamp inactive, attempting all of them even if one fails
pub(crate) fn switch_off_all(
    driver: &dyn IndicatorDriver,
    lamps: &[LampId],
) -> Result<(), OneClickError> {
    let mut first_error = None;
    for &lamp in lamps {
        if let Err(e) = driver.set_lamp(lamp, Level::Inactive) {
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Lamps {
        levels: Mutex<Vec<(LampId, Level)>>,
        fail_on: Option<LampId>,
    }

    impl IndicatorDriver for Lamps {
        fn configure_output(&self, _lamp: LampId) -> oneclick_core::Result<()> {
            Ok(())
        }

        fn set_lamp(&self, lamp: LampId, level: Level) -> oneclick_core::Result<()> {
            if self.fail_on == Some(lamp) && level == Level::Active {
                return Err(OneClickError::hardware(lamp, "pin busy"));
            }
            self.levels.lock().unwrap().push((lamp, level));
            Ok(())
        }
    }

    fn pattern() -> BlinkPattern {
        BlinkPattern {
            start_delay: Duration::from_millis(10),
            half_toggle: Duration::from_millis(5),
            toggles_per_lamp: 2,
        }
    }

    fn session(driver: Arc<Lamps>, cancel: CancellationToken) -> IndicatorSession {
        let lamps: Arc<[LampId]> = Arc::from(vec![LampId::new(1), LampId::new(2)]);
        IndicatorSession::new(SessionId(1), driver, lamps, pattern(), cancel)
    }

    #[tokio::test(start_paused = true)]
    async fn uninterrupted_session_completes_and_clears_lamps() {
        let driver = Arc::new(Lamps::default());
        let report = session(driver.clone(), CancellationToken::new()).run().await;

        assert_eq!(report.state, SessionState::Completed);
        assert!(report.error.is_none());
        // start delay + 2 lamps * 2 toggles * 2 half-toggles
        assert!(report.elapsed >= Duration::from_millis(50));
        assert!(report.elapsed < Duration::from_millis(60));

        let levels = driver.levels.lock().unwrap();
        // start sweep (2) + 2 lamps * 2 toggles * 2 writes + end sweep (2)
        assert_eq!(levels.len(), 2 + 8 + 2);
        assert_eq!(
            &levels[2..6],
            &[
                (LampId::new(1), Level::Inactive),
                (LampId::new(1), Level::Active),
                (LampId::new(1), Level::Inactive),
                (LampId::new(1), Level::Active),
            ]
        );
        assert!(levels[10..].iter().all(|(_, level)| *level == Level::Inactive));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_before_start_writes_only_cleanup() {
        let driver = Arc::new(Lamps::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = session(driver.clone(), cancel).run().await;

        assert_eq!(report.state, SessionState::Cancelled);
        let levels = driver.levels.lock().unwrap();
        assert_eq!(levels.len(), 2);
        assert!(levels.iter().all(|(_, level)| *level == Level::Inactive));
    }

    #[tokio::test(start_paused = true)]
    async fn write_failure_fails_session_after_cleanup() {
        let driver = Arc::new(Lamps {
            fail_on: Some(LampId::new(2)),
            ..Lamps::default()
        });
        let report = session(driver.clone(), CancellationToken::new()).run().await;

        assert_eq!(report.state, SessionState::Failed);
        assert!(report.error.as_ref().is_some_and(OneClickError::is_hardware));

        let levels = driver.levels.lock().unwrap();
        let tail = &levels[levels.len() - 2..];
        assert!(tail.iter().all(|(_, level)| *level == Level::Inactive));
    }

    #[test]
    fn terminal_states() {
        assert!(!SessionState::Idle.is_terminal());
        assert!(!SessionState::Running.is_terminal());
        assert!(SessionState::Completed.is_terminal());
        assert!(SessionState::Cancelled.is_terminal());
        assert!(SessionState::Failed.is_terminal());
    }
}
