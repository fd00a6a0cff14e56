//! Single-slot session occupancy
//!
//! The lamp bank has one owner at a time. The slot holds the owner's
//! cancellation token and the receiving end of its acknowledgement channel;
//! ownership passes only through `vacate` + `ActiveSession::stop`, never by
//! letting two sessions overlap.

use crate::session::{SessionId, SessionReport};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// The session currently owning the lamps
pub(crate) struct ActiveSession {
    pub(crate) id: SessionId,
    pub(crate) cancel: CancellationToken,
    pub(crate) ack: oneshot::Receiver<SessionReport>,
    pub(crate) task: JoinHandle<()>,
}

impl ActiveSession {
    /// Cancel the session and wait at most `ack_timeout` for its report
    ///
    /// A session that does not acknowledge in time is aborted and abandoned;
    /// the caller proceeds either way.
    pub(crate) async fn stop(mut self, ack_timeout: Duration) -> Option<SessionReport> {
        self.cancel.cancel();
        match tokio::time::timeout(ack_timeout, &mut self.ack).await {
            Ok(Ok(report)) => {
                debug!(session = %self.id, state = ?report.state, "Session acknowledged");
                Some(report)
            }
            Ok(Err(_)) => {
                warn!(session = %self.id, "Session ended without acknowledging");
                None
            }
            Err(_) => {
                warn!(
                    session = %self.id,
                    timeout_ms = ack_timeout.as_millis() as u64,
                    "Session did not acknowledge cancellation in time, abandoning it"
                );
                self.task.abort();
                None
            }
        }
    }
}

/// Holder of the lamp bank's single occupancy token
#[derive(Default)]
pub(crate) struct SessionSlot {
    active: Option<ActiveSession>,
}

impl SessionSlot {
    /// Install `session` as the owner
    ///
    /// The slot must have been vacated first.
    pub(crate) fn occupy(&mut self, session: ActiveSession) {
        debug_assert!(self.active.is_none(), "session slot already occupied");
        self.active = Some(session);
    }

    /// Remove and return the owner
    pub(crate) fn vacate(&mut self) -> Option<ActiveSession> {
        self.active.take()
    }

    /// ID of the owner
    pub(crate) fn occupant(&self) -> Option<SessionId> {
        self.active.as_ref().map(|session| session.id)
    }

    /// Whether the owner's task is still executing
    pub(crate) fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|session| !session.task.is_finished())
    }
}

impl Drop for SessionSlot {
    fn drop(&mut self) {
        // Let an orphaned session clean up its lamps and exit
        if let Some(session) = &self.active {
            session.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use tokio::time::Instant;

    fn unresponsive_session() -> ActiveSession {
        let (ack_tx, ack) = oneshot::channel();
        let task = tokio::spawn(async move {
            let _keep_open = ack_tx;
            std::future::pending::<()>().await;
        });
        ActiveSession {
            id: SessionId(7),
            cancel: CancellationToken::new(),
            ack,
            task,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stop_gives_up_after_timeout_and_aborts() {
        let session = unresponsive_session();
        let cancel = session.cancel.clone();

        let started = Instant::now();
        let report = session.stop(Duration::from_secs(2)).await;

        assert!(report.is_none());
        assert!(cancel.is_cancelled());
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert!(started.elapsed() < Duration::from_millis(2010));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_returns_report_when_acknowledged() {
        let (ack_tx, ack) = oneshot::channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            token.cancelled().await;
            let _ = ack_tx.send(SessionReport {
                id: SessionId(3),
                state: SessionState::Cancelled,
                error: None,
                elapsed: Duration::ZERO,
            });
        });
        let session = ActiveSession {
            id: SessionId(3),
            cancel,
            ack,
            task,
        };

        let report = session.stop(Duration::from_secs(2)).await.unwrap();
        assert_eq!(report.id, SessionId(3));
        assert_eq!(report.state, SessionState::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn slot_holds_one_occupant() {
        let mut slot = SessionSlot::default();
        assert!(slot.occupant().is_none());
        assert!(!slot.is_running());

        slot.occupy(unresponsive_session());
        assert_eq!(slot.occupant(), Some(SessionId(7)));
        assert!(slot.is_running());

        let vacated = slot.vacate().unwrap();
        assert!(slot.occupant().is_none());
        vacated.task.abort();
    }
}
