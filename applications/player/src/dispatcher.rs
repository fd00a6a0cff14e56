/// Sequential dispatch of button presses
///
/// GPIO interrupt callbacks only enqueue `ButtonEvent`s. One loop consumes
/// them in order, so a trigger's playback start completes (or fails) before
/// its indicator session is launched, and two presses never race.
use crate::config::ButtonBinding;
use crate::debounce::Debouncer;
use oneclick_core::PlaylistId;
use oneclick_indicator::{Indicator, SessionId};
use oneclick_playback::{PlaybackController, PlaybackError, TriggerOutcome};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// A rising edge on an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub line: u8,
    pub at: Instant,
}

impl ButtonEvent {
    /// Edge on `line`, stamped now
    pub fn now(line: u8) -> Self {
        Self {
            line,
            at: Instant::now(),
        }
    }
}

/// Producer side of the event queue; safe to call from any thread
pub type EventSender = mpsc::UnboundedSender<ButtonEvent>;

/// What the dispatcher did with one event
#[derive(Debug)]
pub enum Dispatch {
    /// The line has no playlist bound
    Unbound,

    /// Suppressed by the debounce window
    Bounced,

    /// Playback handled and indicator restarted
    Triggered {
        outcome: TriggerOutcome,
        session: SessionId,
    },

    /// Playback failed; the indicator was left alone
    Failed(PlaybackError),
}

pub struct Dispatcher {
    bindings: HashMap<u8, PlaylistId>,
    debouncer: Debouncer,
    controller: PlaybackController,
    indicator: Indicator,
}

impl Dispatcher {
    pub fn new(
        buttons: &[ButtonBinding],
        debounce: Duration,
        controller: PlaybackController,
        indicator: Indicator,
    ) -> Self {
        Self {
            bindings: buttons
                .iter()
                .map(|b| (b.pin, b.playlist.clone()))
                .collect(),
            debouncer: Debouncer::new(debounce),
            controller,
            indicator,
        }
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    /// Handle one edge: debounce, play, restart the indicator
    pub async fn handle(&mut self, event: ButtonEvent) -> Dispatch {
        let Some(playlist) = self.bindings.get(&event.line).cloned() else {
            warn!(line = event.line, "Edge on unbound line");
            return Dispatch::Unbound;
        };

        if !self.debouncer.accept(event.line, event.at) {
            debug!(line = event.line, "Edge suppressed by debounce");
            return Dispatch::Bounced;
        }

        info!(line = event.line, playlist = %playlist, "Button pressed");

        match self.controller.trigger(&playlist).await {
            Ok(outcome) => {
                let session = self.indicator.restart().await;
                Dispatch::Triggered { outcome, session }
            }
            Err(e) => {
                error!(playlist = %playlist, error = %e, "Trigger failed");
                Dispatch::Failed(e)
            }
        }
    }

    /// Consume events until the queue closes or `shutdown` fires, then
    /// switch the lamps off
    pub async fn run(
        &mut self,
        mut events: mpsc::UnboundedReceiver<ButtonEvent>,
        shutdown: CancellationToken,
    ) {
        info!(lines = self.bindings.len(), "Waiting for button presses");

        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => {
                    info!("Shutdown requested");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => {
                        self.handle(event).await;
                    }
                    None => {
                        debug!("Event queue closed");
                        break;
                    }
                },
            }
        }

        self.indicator.shutdown().await;
    }
}
