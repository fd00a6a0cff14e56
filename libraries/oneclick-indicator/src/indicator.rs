//! Indicator launcher - starts, preempts and stops sessions
//!
//! The launcher takes `&mut self` for every state change, so two restarts
//! can never interleave; the single dispatch loop that owns it is the only
//! caller.

use crate::{
    error::{IndicatorError, Result},
    pattern::{BlinkPattern, PreemptionTiming},
    session::{switch_off_all, IndicatorSession, SessionId, SessionReport, SessionState},
    slot::{ActiveSession, SessionSlot},
};
use oneclick_core::{IndicatorDriver, LampId};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shared counters describing session activity
///
/// Cheap to clone; every clone observes the same indicator.
#[derive(Debug, Clone, Default)]
pub struct Activity {
    running: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    started: Arc<AtomicU64>,
    last: Arc<Mutex<Option<(SessionId, SessionState)>>>,
}

impl Activity {
    /// Sessions currently driving the lamps
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously running sessions ever observed
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Sessions started so far
    pub fn started(&self) -> u64 {
        self.started.load(Ordering::SeqCst)
    }

    /// ID and terminal state of the most recently ended session
    pub fn last_outcome(&self) -> Option<(SessionId, SessionState)> {
        self.last.lock().ok().and_then(|last| *last)
    }

    fn enter(&self) {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn leave(&self, id: SessionId, state: SessionState) {
        if let Ok(mut last) = self.last.lock() {
            *last = Some((id, state));
        }
        self.running.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Launcher for preemptible indicator sessions
pub struct Indicator {
    driver: Arc<dyn IndicatorDriver>,
    lamps: Arc<[LampId]>,
    pattern: BlinkPattern,
    timing: PreemptionTiming,
    slot: SessionSlot,
    next_id: u64,
    activity: Activity,
}

impl Indicator {
    /// Claim every lamp as an output and switch them all off
    pub fn new(
        driver: Arc<dyn IndicatorDriver>,
        lamps: Vec<LampId>,
        pattern: BlinkPattern,
        timing: PreemptionTiming,
    ) -> Result<Self> {
        if lamps.is_empty() {
            return Err(IndicatorError::NoLamps);
        }
        for &lamp in &lamps {
            driver.configure_output(lamp)?;
        }
        switch_off_all(driver.as_ref(), &lamps)?;

        info!(
            lamps = ?lamps,
            half_toggle_ms = pattern.half_toggle.as_millis() as u64,
            toggles_per_lamp = pattern.toggles_per_lamp,
            "Indicator ready"
        );

        Ok(Self {
            driver,
            lamps: lamps.into(),
            pattern,
            timing,
            slot: SessionSlot::default(),
            next_id: 0,
            activity: Activity::default(),
        })
    }

    /// Lamps in display order
    pub fn lamps(&self) -> &[LampId] {
        &self.lamps
    }

    /// Blink timing
    pub fn pattern(&self) -> BlinkPattern {
        self.pattern
    }

    /// Preemption bounds
    pub fn timing(&self) -> PreemptionTiming {
        self.timing
    }

    /// Activity counters shared with the session tasks
    pub fn activity(&self) -> Activity {
        self.activity.clone()
    }

    /// ID of the session holding the lamps, finished or not
    pub fn active_session(&self) -> Option<SessionId> {
        self.slot.occupant()
    }

    /// Whether a session is currently driving the lamps
    pub fn is_running(&self) -> bool {
        self.slot.is_running()
    }

    /// Preempt the current session (if any) and start a new one
    ///
    /// Returns once the new session has been spawned. The previous session
    /// has either acknowledged with its lamps off, or been abandoned after
    /// `PreemptionTiming::ack_timeout`.
    pub async fn restart(&mut self) -> SessionId {
        if let Some(report) = self.preempt().await {
            debug!(session = %report.id, state = ?report.state, "Previous session handed over");
        }
        self.spawn()
    }

    /// Stop the current session without starting another
    pub async fn cancel(&mut self) -> Option<SessionReport> {
        self.preempt().await
    }

    /// Stop everything and leave the lamps dark
    pub async fn shutdown(&mut self) {
        self.preempt().await;
        if let Err(e) = switch_off_all(self.driver.as_ref(), &self.lamps) {
            warn!(error = %e, "Failed to switch lamps off at shutdown");
        }
        info!("Indicator shut down");
    }

    async fn preempt(&mut self) -> Option<SessionReport> {
        let active = self.slot.vacate()?;
        let report = active.stop(self.timing.ack_timeout).await;

        if !self.timing.grace.is_zero() {
            tokio::time::sleep(self.timing.grace).await;
        }
        report
    }

    fn spawn(&mut self) -> SessionId {
        self.next_id += 1;
        let id = SessionId(self.next_id);
        let cancel = CancellationToken::new();
        let (ack_tx, ack) = oneshot::channel();

        let session = IndicatorSession::new(
            id,
            Arc::clone(&self.driver),
            Arc::clone(&self.lamps),
            self.pattern,
            cancel.clone(),
        );
        let activity = self.activity.clone();
        let task = tokio::spawn(async move {
            activity.enter();
            let report = session.run().await;
            activity.leave(report.id, report.state);
            // Nobody listening means the launcher already gave up on us
            let _ = ack_tx.send(report);
        });

        debug!(session = %id, "Indicator session spawned");
        self.slot.occupy(ActiveSession {
            id,
            cancel,
            ack,
            task,
        });
        id
    }
}
